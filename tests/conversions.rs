use textkit::convert::{self, ConvertOptions, Direction};
use textkit::encoding::{self, DecodeOptions, EncodeOptions, UrlMode};

#[test]
fn yaml_flows_through_json_into_xml() {
    let yaml = "site:\n  name: demo\n  tags: [a, b]\n";
    let options = ConvertOptions {
        json_indent: 0,
        ..ConvertOptions::default()
    };

    let json = convert::convert(yaml, Direction::YamlToJson, &options).unwrap();
    assert_eq!(json, r#"{"site":{"name":"demo","tags":["a","b"]}}"#);

    let options = ConvertOptions {
        xml_declaration: false,
        ..ConvertOptions::default()
    };
    let xml = convert::convert(&json, Direction::JsonToXml, &options).unwrap();
    assert_eq!(
        xml,
        "<site>\n  <name>demo</name>\n  <tags>a</tags>\n  <tags>b</tags>\n</site>\n"
    );
}

#[test]
fn yaml_indent_option_applies_to_json_to_yaml() {
    let options = ConvertOptions {
        yaml_indent: 4,
        ..ConvertOptions::default()
    };
    let yaml = convert::convert(r#"{"a":{"b":1}}"#, Direction::JsonToYaml, &options).unwrap();
    assert_eq!(yaml, "a:\n    b: 1\n");
}

#[test]
fn parse_errors_name_the_input_format() {
    let options = ConvertOptions::default();
    for (input, direction, format) in [
        ("{", Direction::JsonToYaml, "json"),
        ("<a>", Direction::XmlToJson, "xml"),
    ] {
        let err = convert::convert(input, direction, &options).unwrap_err();
        assert_eq!(err.code.as_str(), "input.parse_failed");
        assert_eq!(err.details["format"], format);
    }
}

#[test]
fn data_uri_survives_encode_and_decode() {
    let options = EncodeOptions {
        data_uri: Some("text/plain".to_string()),
        ..EncodeOptions::default()
    };
    let uri = encoding::base64_encode(b"hi", &options);
    assert_eq!(uri, "data:text/plain;base64,aGk=");

    let decoded = encoding::base64_decode(&uri, &DecodeOptions::default()).unwrap();
    assert_eq!(decoded.text, "hi");
    assert_eq!(decoded.mime_type.as_deref(), Some("text/plain"));
}

#[test]
fn query_strings_decode_in_form_mode() {
    assert_eq!(encoding::url_encode("a b", UrlMode::Form), "a+b");

    let params =
        encoding::url_parse_query("https://x.io/p?q=a+b&empty=&n=%C3%A9#frag").unwrap();
    let pairs: Vec<(&str, &str)> = params
        .iter()
        .map(|p| (p.key.as_str(), p.value.as_str()))
        .collect();
    assert_eq!(pairs, vec![("q", "a b"), ("empty", ""), ("n", "é")]);
}
