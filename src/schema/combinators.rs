//! Schema wrappers that compose with any [`SchemaLike`].
//!
//! - [`Optional`]: an absent value short-circuits as valid
//! - [`Refined`]: an extra predicate checked after the inner schema succeeds
//!
//! Both wrappers take the inner schema by value and leave it untouched, so a
//! base schema can be cloned into several forms and refined differently in each.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use stillwater::Validation;

use crate::error::{Issue, IssueKind, Issues};
use crate::path::FieldPath;

use super::traits::SchemaLike;

/// A schema whose value may be absent.
///
/// `null` (which is also what an object schema passes for a missing key)
/// validates to `None` without consulting the inner schema. Present values
/// go through the inner schema unchanged.
#[derive(Clone)]
pub struct Optional<S> {
    inner: S,
}

impl<S> Optional<S> {
    pub(crate) fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: SchemaLike> SchemaLike for Optional<S> {
    type Output = Option<S::Output>;

    fn validate(&self, value: &Value, path: &FieldPath) -> Validation<Self::Output, Issues> {
        if value.is_null() {
            return Validation::Success(None);
        }
        self.inner.validate(value, path).map(Some)
    }
}

impl<S> fmt::Debug for Optional<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Optional").finish_non_exhaustive()
    }
}

type Predicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// A schema with an additional custom constraint.
///
/// The predicate only sees values the inner schema accepted; if the inner
/// schema fails, its issues are reported and the predicate is skipped.
pub struct Refined<S: SchemaLike> {
    inner: S,
    predicate: Predicate<S::Output>,
    message: String,
}

impl<S: SchemaLike> Refined<S> {
    pub(crate) fn new<F>(inner: S, predicate: F, message: impl Into<String>) -> Self
    where
        F: Fn(&S::Output) -> bool + Send + Sync + 'static,
    {
        Self {
            inner,
            predicate: Arc::new(predicate),
            message: message.into(),
        }
    }
}

impl<S: SchemaLike + Clone> Clone for Refined<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            predicate: Arc::clone(&self.predicate),
            message: self.message.clone(),
        }
    }
}

impl<S: SchemaLike> SchemaLike for Refined<S> {
    type Output = S::Output;

    fn validate(&self, value: &Value, path: &FieldPath) -> Validation<Self::Output, Issues> {
        match self.inner.validate(value, path) {
            Validation::Success(output) if (self.predicate)(&output) => Validation::Success(output),
            Validation::Success(_) => Validation::Failure(Issues::single(
                Issue::new(path.clone(), self.message.clone())
                    .with_kind(IssueKind::ConstraintViolation),
            )),
            Validation::Failure(issues) => Validation::Failure(issues),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;
    use serde_json::json;

    fn unwrap_failure<T: std::fmt::Debug, E>(v: Validation<T, E>) -> E {
        v.into_result().unwrap_err()
    }

    #[test]
    fn test_optional_accepts_null() {
        let schema = Schema::string().email("bad email").optional();
        let result = schema.validate(&json!(null), &FieldPath::root());
        assert_eq!(result.into_result().unwrap(), None);
    }

    #[test]
    fn test_optional_still_checks_present_values() {
        let schema = Schema::string().email("bad email").optional();

        let result = schema.validate(&json!("a@b.co"), &FieldPath::root());
        assert_eq!(result.into_result().unwrap(), Some("a@b.co".to_string()));

        let errors = unwrap_failure(schema.validate(&json!("nope"), &FieldPath::root()));
        assert_eq!(errors.first().message, "bad email");
    }

    #[test]
    fn test_optional_to_value_is_null() {
        let schema = Schema::boolean().optional();
        let result = schema.validate_to_value(&json!(null), &FieldPath::root());
        assert_eq!(result.into_result().unwrap(), Value::Null);
    }

    #[test]
    fn test_refine_runs_after_inner_success() {
        let schema = Schema::string()
            .min(2, "too short")
            .refine(|s: &String| s.starts_with('#'), "must start with #");

        let errors = unwrap_failure(schema.validate(&json!("x"), &FieldPath::root()));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.first().message, "too short");

        let errors = unwrap_failure(schema.validate(&json!("xy"), &FieldPath::root()));
        assert_eq!(errors.first().message, "must start with #");
        assert_eq!(errors.first().kind, IssueKind::ConstraintViolation);

        assert!(schema.validate(&json!("#y"), &FieldPath::root()).is_success());
    }

    #[test]
    fn test_refine_reports_at_given_path() {
        let schema = Schema::boolean().refine(|b: &bool| *b, "auth.validation.acceptTerms");
        let path = FieldPath::from_field("acceptTerms");
        let errors = unwrap_failure(schema.validate(&json!(false), &path));
        assert_eq!(errors.first().path, path);
    }

    #[test]
    fn test_refining_a_clone_leaves_base_untouched() {
        let base = Schema::string().required("required");
        let strict = base.clone().refine(|s: &String| s.len() > 5, "longer please");

        assert!(base.validate(&json!("abc"), &FieldPath::root()).is_success());
        assert!(strict.validate(&json!("abc"), &FieldPath::root()).is_failure());
    }
}
