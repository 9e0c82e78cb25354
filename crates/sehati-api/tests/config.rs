use sehati_api::config::parse_credentials;

#[test]
fn credentials_split_on_first_colon() {
    let (user, pass) = parse_credentials("admin:pa:ss").unwrap();
    assert_eq!(user, "admin");
    assert_eq!(pass, "pa:ss");
}

#[test]
fn credentials_need_both_parts() {
    assert!(parse_credentials("admin").is_err());
    assert!(parse_credentials(":secret").is_err());
    assert!(parse_credentials("admin:").is_err());
}
