use super::*;

fn urlencoded(body: &str) -> Vec<(String, String)> {
    parse_pairs(Some("application/x-www-form-urlencoded"), body.as_bytes()).unwrap()
}

#[test]
fn test_parse_pairs_urlencoded() {
    assert_eq!(
        urlencoded("text=hello+world&group=3&pub_date=2010-01-01"),
        vec![
            ("text".to_string(), "hello world".to_string()),
            ("group".to_string(), "3".to_string()),
            ("pub_date".to_string(), "2010-01-01".to_string()),
        ]
    );
}

#[test]
fn test_parse_pairs_json() {
    let pairs = parse_pairs(
        Some("application/json; charset=utf-8"),
        br#"{"text": "hello", "group": 3, "skip": null}"#,
    )
    .unwrap();

    assert_eq!(
        pairs,
        vec![
            ("group".to_string(), "3".to_string()),
            ("text".to_string(), "hello".to_string()),
        ]
    );

    assert!(parse_pairs(Some("application/json"), b"[1, 2]").is_err());
    assert!(parse_pairs(Some("application/json"), b"not json").is_err());
}

#[test]
fn test_post_data_ignores_unknown_keys() {
    let data = PostData::from_pairs(urlencoded("text=hi&pub_date=2010-01-01&author=7"));

    assert_eq!(data.text.as_deref(), Some("hi"));
    assert_eq!(data.group, None);
}

#[test]
fn test_post_form_requires_text() {
    let errors = PostData::default().validate().unwrap_err();
    assert_eq!(errors["text"], vec![REQUIRED_ERROR.to_string()]);

    let errors = PostData {
        text: Some("   \n\t ".to_string()),
        group: None,
    }
    .validate()
    .unwrap_err();
    assert_eq!(errors["text"], vec![REQUIRED_ERROR.to_string()]);
}

#[test]
fn test_post_form_strips_text() {
    let form = PostData {
        text: Some("  hello  ".to_string()),
        group: None,
    }
    .validate()
    .unwrap();

    assert_eq!(form.text, "hello");
    assert_eq!(form.group, None);
}

#[test]
fn test_post_form_group_choices() {
    let form = PostData {
        text: Some("hi".to_string()),
        group: Some(String::new()),
    }
    .validate()
    .unwrap();
    assert_eq!(form.group, None);

    let form = PostData {
        text: Some("hi".to_string()),
        group: Some("42".to_string()),
    }
    .validate()
    .unwrap();
    assert_eq!(form.group, Some(42));

    let errors = PostData {
        text: Some("hi".to_string()),
        group: Some("abc".to_string()),
    }
    .validate()
    .unwrap_err();
    assert_eq!(errors["group"], vec![INVALID_CHOICE_ERROR.to_string()]);
}

#[test]
fn test_comment_form() {
    let errors = CommentData::default().validate().unwrap_err();
    assert_eq!(errors["text"], vec![REQUIRED_ERROR.to_string()]);

    let form = CommentData {
        text: Some(" nice ".to_string()),
    }
    .validate()
    .unwrap();
    assert_eq!(form.text, "nice");
}

#[test]
fn test_definitions() {
    let definition = PostForm::definition();
    assert_eq!(definition.fields.len(), 2);
    assert!(definition.fields.iter().all(|field| field.initial.is_none()));
    assert_eq!(definition.fields[0].name, "text");
    assert!(definition.fields[0].required);
    assert_eq!(definition.fields[1].name, "group");
    assert!(!definition.fields[1].required);

    let definition = CommentForm::definition();
    assert_eq!(definition.fields.len(), 1);
    assert_eq!(definition.fields[0].name, "text");
    assert!(definition.fields[0].required);
}
