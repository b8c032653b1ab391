//! Integration tests for form binding: typed parse, issue accumulation and
//! the register form end to end.

use fieldwork::{aggregate, create_form, Form, FormOptions, IssueKind, Schema};
use proptest::prelude::*;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Register {
    full_name: String,
    email: String,
    password: String,
    accept_terms: bool,
    plan: String,
    referral: Option<String>,
}

fn register_form() -> Form<Register> {
    create_form(
        Schema::object()
            .field("fullName", Schema::string().required("auth.validation.fullName"))
            .field(
                "email",
                Schema::string()
                    .required("auth.validation.required")
                    .email("auth.validation.email"),
            )
            .field(
                "password",
                Schema::string()
                    .required("auth.validation.required")
                    .min(8, "auth.validation.passwordLength"),
            )
            .field("acceptTerms", Schema::boolean().must_be_true("auth.validation.acceptTerms"))
            .default(
                "plan",
                Schema::string().one_of(["free", "pro"], "auth.validation.plan"),
                json!("free"),
            )
            .optional("referral", Schema::string()),
        FormOptions::default().with_name("register"),
    )
}

#[test]
fn test_register_scenario_reports_every_field_in_order() {
    let raw = json!({
        "fullName": "",
        "email": "a@",
        "password": "abc",
        "acceptTerms": false
    });

    let issues = register_form().safe_parse(&raw).into_result().unwrap_err();
    assert_eq!(issues.len(), 4);

    let heads: Vec<String> = issues.iter().filter_map(|i| i.path.head_key()).collect();
    assert_eq!(heads, vec!["fullName", "email", "password", "acceptTerms"]);

    let errors = aggregate::from_schema_issues(&issues);
    assert_eq!(errors.len(), 4);
    assert_eq!(errors.keys().collect::<Vec<_>>(), vec!["fullName", "email", "password", "acceptTerms"]);
    for key in ["fullName", "email", "password", "acceptTerms"] {
        assert_eq!(errors.get(key).len(), 1, "{key}");
    }
    assert_eq!(errors.first("password"), Some("auth.validation.passwordLength"));
}

#[test]
fn test_single_violation_yields_single_issue() {
    let raw = json!({
        "fullName": "Ada Lovelace",
        "email": "ada@example.com",
        "password": "hunter22",
        "acceptTerms": "yes"
    });

    let issues = register_form().safe_parse(&raw).into_result().unwrap_err();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues.first().path.head_key().as_deref(), Some("acceptTerms"));
    assert_eq!(issues.first().kind, IssueKind::TypeMismatch);
}

#[test]
fn test_success_decodes_typed_output() {
    let raw = json!({
        "fullName": "Ada Lovelace",
        "email": "ada@example.com",
        "password": "hunter22",
        "acceptTerms": true,
        "tracking": "utm"
    });

    let data = register_form().safe_parse(&raw).into_result().unwrap();
    assert_eq!(
        data,
        Register {
            full_name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
            password: "hunter22".into(),
            accept_terms: true,
            plan: "free".into(),
            referral: None,
        }
    );
}

#[test]
fn test_parse_is_deterministic() {
    let form = register_form();
    let raw = json!({"email": "bad", "password": "x"});

    let first = form.safe_parse(&raw).into_result().unwrap_err();
    let second = form.safe_parse(&raw).into_result().unwrap_err();
    assert_eq!(first, second);
}

#[test]
fn test_parse_returns_issues_as_error() {
    let form = register_form();
    assert!(form.parse(&json!({})).is_err());
    assert!(form.parse(&json!(null)).is_err());
}

#[test]
fn test_cloned_form_validates_identically() {
    let form = register_form();
    let copy = form.clone();
    let raw = json!({"fullName": "x"});
    assert_eq!(
        form.safe_parse(&raw).into_result().unwrap_err(),
        copy.safe_parse(&raw).into_result().unwrap_err()
    );
    assert_eq!(form.options().name(), "register");
}

prop_compose! {
    fn valid_register()(
        full_name in "[A-Za-z][A-Za-z ]{0,20}",
        user in "[a-z]{1,10}",
        domain in "[a-z]{1,10}",
        tld in "[a-z]{2,4}",
        password in "[a-zA-Z0-9]{8,24}",
        plan in prop_oneof![Just("free"), Just("pro")],
        referral in proptest::option::of("[a-z]{1,8}"),
    ) -> Register {
        Register {
            full_name,
            email: format!("{user}@{domain}.{tld}"),
            password,
            accept_terms: true,
            plan: plan.to_string(),
            referral,
        }
    }
}

proptest! {
    #[test]
    fn prop_valid_input_round_trips(expected in valid_register()) {
        let raw = json!({
            "fullName": expected.full_name,
            "email": expected.email,
            "password": expected.password,
            "acceptTerms": expected.accept_terms,
            "plan": expected.plan,
            "referral": expected.referral,
        });

        let data = register_form().safe_parse(&raw).into_result();
        prop_assert_eq!(data.ok(), Some(expected));
    }

    #[test]
    fn prop_one_issue_per_broken_field(
        break_name in any::<bool>(),
        break_email in any::<bool>(),
        break_password in any::<bool>(),
        break_terms in any::<bool>(),
    ) {
        let raw = json!({
            "fullName": if break_name { "" } else { "Ada" },
            "email": if break_email { "a@" } else { "ada@example.com" },
            "password": if break_password { "abc" } else { "hunter22" },
            "acceptTerms": !break_terms,
        });

        let expected: Vec<&str> = [
            (break_name, "fullName"),
            (break_email, "email"),
            (break_password, "password"),
            (break_terms, "acceptTerms"),
        ]
        .into_iter()
        .filter(|(broken, _)| *broken)
        .map(|(_, field)| field)
        .collect();

        match register_form().safe_parse(&raw).into_result() {
            Ok(_) => prop_assert!(expected.is_empty()),
            Err(issues) => {
                let heads: Vec<String> = issues.iter().filter_map(|i| i.path.head_key()).collect();
                prop_assert_eq!(heads, expected);
            }
        }
    }
}
