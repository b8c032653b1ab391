//! A live form: validation, server errors and translation wired to a
//! published error map.

use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use stillwater::Validation;

use crate::aggregate::{from_schema_issues, from_server, merge, FieldErrorMap, ServerError, ServerErrorOptions};
use crate::form::Form;
use crate::i18n::Translator;
use crate::reactive::{ReadOnlyChannel, ValueChannel};

/// Drives one form through submit, server feedback and locale changes.
///
/// The session keeps the untranslated error map so a locale switch can be
/// re-rendered with [`refresh`](Self::refresh); subscribers of
/// [`errors`](Self::errors) only ever see translated messages.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use fieldwork::{create_form, FormOptions, FormSession, Schema, ServerError, Translator};
/// use serde::Deserialize;
/// use serde_json::json;
///
/// #[derive(Debug, Deserialize)]
/// struct Reset {
///     email: String,
/// }
///
/// let translator = Arc::new(Translator::default());
/// translator.set_translation("pt-BR", [("auth.validation.email", "E-mail inválido")], false);
///
/// let form = create_form::<Reset>(
///     Schema::object().field("email", Schema::string().email("auth.validation.email")),
///     FormOptions::default(),
/// );
/// let session = FormSession::new(form, translator);
///
/// assert!(session.submit(&json!({"email": "a@"})).is_none());
/// assert_eq!(session.first_error("email").as_deref(), Some("E-mail inválido"));
///
/// let data = session.submit(&json!({"email": "ada@example.com"})).unwrap();
/// session.apply_server_error(Some(&ServerError::new("http_409").with_field_error("email", "taken")));
/// assert_eq!(data.email, "ada@example.com");
/// assert_eq!(session.field_errors("email"), vec!["taken"]);
/// ```
pub struct FormSession<T> {
    form: Form<T>,
    translator: Arc<Translator>,
    server_options: ServerErrorOptions,
    raw: RefCell<FieldErrorMap>,
    channel: ValueChannel<FieldErrorMap>,
}

impl<T: DeserializeOwned> FormSession<T> {
    pub fn new(form: Form<T>, translator: Arc<Translator>) -> Self {
        Self {
            form,
            translator,
            server_options: ServerErrorOptions::default(),
            raw: RefCell::new(FieldErrorMap::new()),
            channel: ValueChannel::new(FieldErrorMap::new()),
        }
    }

    /// Sets how `{code, params}` server errors are mapped.
    pub fn with_server_options(mut self, options: ServerErrorOptions) -> Self {
        self.server_options = options;
        self
    }

    pub fn form(&self) -> &Form<T> {
        &self.form
    }

    /// Validates `raw`. On failure the errors replace the current ones and
    /// `None` is returned; on success the errors are cleared.
    pub fn submit(&self, raw: &Value) -> Option<T> {
        match self.form.safe_parse(raw) {
            Validation::Success(data) => {
                self.publish(FieldErrorMap::new());
                Some(data)
            }
            Validation::Failure(issues) => {
                self.publish(from_schema_issues(&issues));
                None
            }
        }
    }

    /// Adds whatever `error` says about fields to the current errors.
    pub fn apply_server_error(&self, error: Option<&ServerError>) {
        let server = from_server(error, &self.server_options);
        if server.is_empty() {
            return;
        }
        let current = self.raw.borrow().clone();
        self.publish(merge([current, server]));
    }

    /// Re-translates the current errors, e.g. after a locale change.
    pub fn refresh(&self) {
        let current = self.raw.borrow().clone();
        self.publish(current);
    }

    /// Clears all errors.
    pub fn reset(&self) {
        self.publish(FieldErrorMap::new());
    }

    /// The translated error map, for rendering.
    pub fn errors(&self) -> ReadOnlyChannel<FieldErrorMap> {
        self.channel.as_read_only()
    }

    pub fn field_errors(&self, field: &str) -> Vec<String> {
        self.channel.value().get(field).to_vec()
    }

    /// The message to show inline next to `field`.
    pub fn first_error(&self, field: &str) -> Option<String> {
        self.channel.value().first(field).map(str::to_string)
    }

    fn publish(&self, raw: FieldErrorMap) {
        let translated = self.translator.translate_all(&raw);
        *self.raw.borrow_mut() = raw;
        self.channel.next(translated);
    }
}

impl<T> fmt::Debug for FormSession<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormSession")
            .field("form", &self.form)
            .field("errors", &self.raw)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{create_form, FormOptions};
    use crate::schema::Schema;
    use serde::Deserialize;
    use serde_json::json;
    use std::rc::Rc;

    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Login {
        email: String,
        password: String,
    }

    fn session() -> FormSession<Login> {
        let translator = Arc::new(Translator::default());
        translator.set_translation(
            "pt-BR",
            [
                ("auth.validation.required", "Campo obrigatório"),
                ("auth.validation.email", "E-mail inválido"),
            ],
            false,
        );
        translator.set_translation("en-US", [("auth.validation.required", "Required")], false);

        let form = create_form(
            Schema::object()
                .field(
                    "email",
                    Schema::string()
                        .required("auth.validation.required")
                        .email("auth.validation.email"),
                )
                .field("password", Schema::string().required("auth.validation.required")),
            FormOptions::default().with_name("login"),
        );
        FormSession::new(form, translator)
    }

    #[test]
    fn test_submit_failure_publishes_translated_errors() {
        let session = session();
        assert!(session.submit(&json!({"email": "a@"})).is_none());

        assert_eq!(session.field_errors("email"), vec!["E-mail inválido"]);
        assert_eq!(session.first_error("password").as_deref(), Some("Campo obrigatório"));
    }

    #[test]
    fn test_submit_success_clears_errors() {
        let session = session();
        session.submit(&json!({}));
        let data = session.submit(&json!({"email": "ada@example.com", "password": "x"}));

        assert!(data.is_some());
        assert!(session.errors().value().is_empty());
    }

    #[test]
    fn test_server_errors_append_after_client_errors() {
        let session = session();
        session.submit(&json!({"email": "a@", "password": "x"}));
        session.apply_server_error(Some(&ServerError::new("VALIDATION_ERROR").with_param_error(
            crate::aggregate::ServerFieldError {
                field: Some("body.email".into()),
                kind: Some("missing".into()),
                message: "missing".into(),
                ..Default::default()
            },
        )));

        assert_eq!(session.field_errors("email"), vec!["E-mail inválido", "Campo obrigatório"]);
    }

    #[test]
    fn test_refresh_after_locale_change() {
        let session = session();
        session.submit(&json!({"email": "ada@example.com"}));
        assert_eq!(session.first_error("password").as_deref(), Some("Campo obrigatório"));

        session.translator.use_locale("en-US");
        session.refresh();
        assert_eq!(session.first_error("password").as_deref(), Some("Required"));
    }

    #[test]
    fn test_subscribers_see_each_publish() {
        let session = session();
        let counts = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&counts);
        let _sub = session.errors().subscribe(move |errors| sink.borrow_mut().push(errors.len()));

        session.submit(&json!({}));
        session.reset();

        assert_eq!(*counts.borrow(), vec![0, 2, 0]);
    }

    #[test]
    fn test_empty_server_error_publishes_nothing() {
        let session = session();
        let calls = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&calls);
        let _sub = session.errors().subscribe(move |_| *sink.borrow_mut() += 1);

        session.apply_server_error(None);
        assert_eq!(*calls.borrow(), 1);
    }
}
