//! Declarative field validation for the client's forms.
//!
//! A [`ValidationSchema`] lists, per field, the rules its value must satisfy
//! plus any cross-field rules. Field-local rules always run first; a
//! cross-field rule only runs once every field it involves passes its local
//! rules. Blank input is reported as missing before any shape rule looks at it.

use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

/// Field name to message, holding only the fields that are currently invalid.
pub type FieldErrors = BTreeMap<String, String>;

static EMAIL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@.]+$").expect("email pattern is valid")
});

/// A borrowed view of one field's current value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldRef<'a> {
    /// Free text, including numbers typed into inputs.
    Text(&'a str),
    /// Multi-select values.
    List(&'a [String]),
    /// Toggle.
    Flag(bool),
}

impl FieldRef<'_> {
    fn is_blank(&self) -> bool {
        match self {
            Self::Text(text) => text.trim().is_empty(),
            Self::List(items) => items.is_empty(),
            Self::Flag(_) => false,
        }
    }
}

/// An owned value used to update a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldInput {
    /// Free text.
    Text(String),
    /// Multi-select values.
    List(Vec<String>),
    /// Toggle.
    Flag(bool),
}

impl From<&str> for FieldInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for FieldInput {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<Vec<String>> for FieldInput {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

/// Typed form values addressable by field name.
pub trait FormValues: Clone + fmt::Debug {
    /// Current value of `name`, or `None` for a field this form does not have.
    fn field(&self, name: &str) -> Option<FieldRef<'_>>;

    /// Replaces the value of `name`. Returns `false` when the form has no such
    /// field or the input kind does not fit it.
    fn set_field(&mut self, name: &str, value: FieldInput) -> bool;
}

/// A single field-local rule and the message it reports.
#[derive(Debug, Clone)]
pub enum Rule {
    /// The value must not be blank.
    Required(String),
    /// At least this many characters.
    MinLength(usize, String),
    /// At most this many characters.
    MaxLength(usize, String),
    /// Looks like an email address.
    Email(String),
    /// Matches the whole pattern.
    Pattern(Regex, String),
    /// Parses as a finite number greater than zero.
    PositiveNumber(String),
    /// The value (or every selected value) is one of these.
    OneOf(Vec<String>, String),
    /// Minimum length plus at least one lowercase, uppercase, digit and symbol.
    PasswordComposition(usize, String),
}

impl Rule {
    /// Non-empty rule.
    pub fn required(message: impl Into<String>) -> Self {
        Self::Required(message.into())
    }

    /// Minimum length rule.
    pub fn min_length(min: usize, message: impl Into<String>) -> Self {
        Self::MinLength(min, message.into())
    }

    /// Maximum length rule.
    pub fn max_length(max: usize, message: impl Into<String>) -> Self {
        Self::MaxLength(max, message.into())
    }

    /// Email shape rule.
    pub fn email(message: impl Into<String>) -> Self {
        Self::Email(message.into())
    }

    /// Whole-value pattern rule.
    ///
    /// # Panics
    /// Panics if `pattern` is not a valid regular expression; schemas are built
    /// from literals.
    pub fn pattern(pattern: &str, message: impl Into<String>) -> Self {
        let anchored = format!("^(?:{pattern})$");
        Self::Pattern(
            Regex::new(&anchored).expect("schema patterns are literals"),
            message.into(),
        )
    }

    /// Numeric and positive rule.
    pub fn positive_number(message: impl Into<String>) -> Self {
        Self::PositiveNumber(message.into())
    }

    /// Enumerated-set membership rule.
    pub fn one_of<I, S>(allowed: I, message: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::OneOf(allowed.into_iter().map(Into::into).collect(), message.into())
    }

    /// Password composition rule.
    pub fn password(min: usize, message: impl Into<String>) -> Self {
        Self::PasswordComposition(min, message.into())
    }

    fn message(&self) -> &str {
        match self {
            Self::Required(message)
            | Self::MinLength(_, message)
            | Self::MaxLength(_, message)
            | Self::Email(message)
            | Self::Pattern(_, message)
            | Self::PositiveNumber(message)
            | Self::OneOf(_, message)
            | Self::PasswordComposition(_, message) => message,
        }
    }

    fn accepts(&self, value: FieldRef<'_>) -> bool {
        match (self, value) {
            (Self::Required(_), value) => !value.is_blank(),
            (Self::MinLength(min, _), FieldRef::Text(text)) => text.chars().count() >= *min,
            (Self::MaxLength(max, _), FieldRef::Text(text)) => text.chars().count() <= *max,
            (Self::Email(_), FieldRef::Text(text)) => EMAIL_SHAPE.is_match(text.trim()),
            (Self::Pattern(pattern, _), FieldRef::Text(text)) => pattern.is_match(text),
            (Self::PositiveNumber(_), FieldRef::Text(text)) => text
                .trim()
                .parse::<f64>()
                .is_ok_and(|number| number.is_finite() && number > 0.0),
            (Self::OneOf(allowed, _), FieldRef::Text(text)) => {
                allowed.iter().any(|item| item == text)
            }
            (Self::OneOf(allowed, _), FieldRef::List(items)) => items
                .iter()
                .all(|item| allowed.iter().any(|allowed| allowed == item)),
            (Self::PasswordComposition(min, _), FieldRef::Text(text)) => {
                text.chars().count() >= *min
                    && text.chars().any(|c| c.is_ascii_lowercase())
                    && text.chars().any(|c| c.is_ascii_uppercase())
                    && text.chars().any(|c| c.is_ascii_digit())
                    && text.chars().any(|c| !c.is_ascii_alphanumeric())
            }
            // Shape rules do not apply to toggles or lists.
            _ => true,
        }
    }
}

#[derive(Debug, Clone)]
struct FieldRules {
    name: &'static str,
    rules: Vec<Rule>,
}

impl FieldRules {
    fn required_message(&self) -> Option<&str> {
        self.rules.iter().find_map(|rule| match rule {
            Rule::Required(message) => Some(message.as_str()),
            _ => None,
        })
    }
}

/// Equality between two fields, reported on `field`.
#[derive(Debug, Clone)]
struct MatchesField {
    field: &'static str,
    other: &'static str,
    message: String,
}

/// Rules for a whole form.
#[derive(Debug, Clone, Default)]
pub struct ValidationSchema {
    fields: Vec<FieldRules>,
    cross: Vec<MatchesField>,
}

impl ValidationSchema {
    /// An empty schema; every form is valid against it.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the rules for `name`, evaluated in the given order.
    #[must_use]
    pub fn field(mut self, name: &'static str, rules: Vec<Rule>) -> Self {
        self.fields.push(FieldRules { name, rules });
        self
    }

    /// Requires `field` to equal `other`; the error is attributed to `field`.
    #[must_use]
    pub fn must_match(
        mut self,
        field: &'static str,
        other: &'static str,
        message: impl Into<String>,
    ) -> Self {
        self.cross.push(MatchesField {
            field,
            other,
            message: message.into(),
        });
        self
    }

    /// Validates one field against `values`, returning its first error.
    pub fn validate_field<T: FormValues>(&self, name: &str, values: &T) -> Option<String> {
        if let Some(message) = self.check_local(name, values) {
            return Some(message);
        }

        self.cross
            .iter()
            .filter(|rule| rule.field == name)
            .find(|rule| {
                self.check_local(rule.other, values).is_none()
                    && values.field(rule.field) != values.field(rule.other)
            })
            .map(|rule| rule.message.clone())
    }

    /// Validates every field. An empty result means the form may be submitted.
    pub fn validate_form<T: FormValues>(&self, values: &T) -> FieldErrors {
        self.field_names()
            .into_iter()
            .filter_map(|name| {
                self.validate_field(name, values)
                    .map(|message| (name.to_string(), message))
            })
            .collect()
    }

    /// Fields carrying a cross-field rule that reads `name`.
    #[must_use]
    pub fn dependents_of(&self, name: &str) -> Vec<&'static str> {
        let mut dependents: Vec<&'static str> = Vec::new();
        for rule in &self.cross {
            if rule.other == name && !dependents.contains(&rule.field) {
                dependents.push(rule.field);
            }
        }
        dependents
    }

    /// Whether `name` passes its own rules, ignoring cross-field rules.
    pub fn passes_local_rules<T: FormValues>(&self, name: &str, values: &T) -> bool {
        self.check_local(name, values).is_none()
    }

    fn field_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.fields.iter().map(|field| field.name).collect();
        for rule in &self.cross {
            if !names.contains(&rule.field) {
                names.push(rule.field);
            }
        }
        names
    }

    fn check_local<T: FormValues>(&self, name: &str, values: &T) -> Option<String> {
        let rules = self.fields.iter().find(|field| field.name == name)?;
        let required = rules.required_message();

        let value = match values.field(name) {
            Some(value) if !value.is_blank() => value,
            _ => return required.map(str::to_string),
        };

        rules
            .rules
            .iter()
            .filter(|rule| !matches!(rule, Rule::Required(_)))
            .find(|rule| !rule.accepts(value))
            .map(|rule| rule.message().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[derive(Debug, Clone, Default)]
    struct Probe {
        name: String,
        secret: String,
        confirm: String,
        tags: Vec<String>,
        flag: bool,
    }

    impl FormValues for Probe {
        fn field(&self, name: &str) -> Option<FieldRef<'_>> {
            match name {
                "name" => Some(FieldRef::Text(&self.name)),
                "secret" => Some(FieldRef::Text(&self.secret)),
                "confirm" => Some(FieldRef::Text(&self.confirm)),
                "tags" => Some(FieldRef::List(&self.tags)),
                "flag" => Some(FieldRef::Flag(self.flag)),
                _ => None,
            }
        }

        fn set_field(&mut self, name: &str, value: FieldInput) -> bool {
            match (name, value) {
                ("name", FieldInput::Text(text)) => self.name = text,
                ("secret", FieldInput::Text(text)) => self.secret = text,
                ("confirm", FieldInput::Text(text)) => self.confirm = text,
                ("tags", FieldInput::List(items)) => self.tags = items,
                ("flag", FieldInput::Flag(flag)) => self.flag = flag,
                _ => return false,
            }
            true
        }
    }

    fn text_schema(rule: Rule) -> ValidationSchema {
        ValidationSchema::new().field("name", vec![Rule::required("missing"), rule])
    }

    fn probe_named(name: &str) -> Probe {
        Probe {
            name: name.to_string(),
            ..Probe::default()
        }
    }

    #[test]
    fn blank_input_reports_missing_before_shape_rules() {
        let schema = text_schema(Rule::email("bad email"));
        assert_eq!(
            schema.validate_field("name", &probe_named("")),
            Some("missing".to_string())
        );
        assert_eq!(
            schema.validate_field("name", &probe_named("   ")),
            Some("missing".to_string())
        );
    }

    #[test]
    fn optional_blank_field_skips_shape_rules() {
        let schema = ValidationSchema::new().field("name", vec![Rule::positive_number("nan")]);
        assert_eq!(schema.validate_field("name", &probe_named("")), None);
        assert_eq!(
            schema.validate_field("name", &probe_named("abc")),
            Some("nan".to_string())
        );
    }

    #[test]
    fn first_failing_rule_wins() {
        let schema = ValidationSchema::new().field(
            "name",
            vec![
                Rule::required("missing"),
                Rule::min_length(3, "short"),
                Rule::pattern("[a-z]+", "letters"),
            ],
        );
        assert_eq!(
            schema.validate_field("name", &probe_named("A")),
            Some("short".to_string())
        );
        assert_eq!(
            schema.validate_field("name", &probe_named("ABC")),
            Some("letters".to_string())
        );
        assert_eq!(schema.validate_field("name", &probe_named("abc")), None);
    }

    #[test_case("a@b.com", true ; "plain")]
    #[test_case("first.last+tag@example.co.uk", true ; "dotted with tag")]
    #[test_case("a@b", false ; "no tld")]
    #[test_case("ab.com", false ; "no at")]
    #[test_case("a b@c.com", false ; "space")]
    #[test_case("a@b.com.", false ; "trailing dot")]
    fn email_shape(input: &str, valid: bool) {
        let schema = text_schema(Rule::email("bad email"));
        assert_eq!(schema.validate_field("name", &probe_named(input)).is_none(), valid);
    }

    #[test_case("12", true ; "integer")]
    #[test_case(" 9.99 ", true ; "decimal with spaces")]
    #[test_case("0", false ; "zero")]
    #[test_case("-3", false ; "negative")]
    #[test_case("twelve", false ; "words")]
    #[test_case("NaN", false ; "nan")]
    #[test_case("inf", false ; "infinite")]
    fn positive_number(input: &str, valid: bool) {
        let schema = text_schema(Rule::positive_number("bad number"));
        assert_eq!(schema.validate_field("name", &probe_named(input)).is_none(), valid);
    }

    #[test_case("Abcdef1!", true ; "all classes")]
    #[test_case("Abc1!", false ; "too short")]
    #[test_case("abcdefg1!", false ; "no uppercase")]
    #[test_case("ABCDEFG1!", false ; "no lowercase")]
    #[test_case("Abcdefgh!", false ; "no digit")]
    #[test_case("Abcdefg12", false ; "no symbol")]
    fn password_composition(input: &str, valid: bool) {
        let schema = text_schema(Rule::password(8, "weak"));
        assert_eq!(schema.validate_field("name", &probe_named(input)).is_none(), valid);
    }

    #[test]
    fn max_length_counts_characters() {
        let schema = text_schema(Rule::max_length(3, "long"));
        assert_eq!(schema.validate_field("name", &probe_named("äöü")), None);
        assert_eq!(
            schema.validate_field("name", &probe_named("abcd")),
            Some("long".to_string())
        );
    }

    #[test]
    fn one_of_checks_every_selected_item() {
        let schema = ValidationSchema::new().field(
            "tags",
            vec![
                Rule::required("pick one"),
                Rule::one_of(["design", "business"], "unknown tag"),
            ],
        );
        let mut probe = Probe::default();
        assert_eq!(
            schema.validate_field("tags", &probe),
            Some("pick one".to_string())
        );

        probe.tags = vec!["design".to_string(), "cooking".to_string()];
        assert_eq!(
            schema.validate_field("tags", &probe),
            Some("unknown tag".to_string())
        );

        probe.tags = vec!["design".to_string(), "business".to_string()];
        assert_eq!(schema.validate_field("tags", &probe), None);
    }

    #[test]
    fn flags_are_never_missing() {
        let schema = ValidationSchema::new().field("flag", vec![Rule::required("missing")]);
        assert_eq!(schema.validate_field("flag", &Probe::default()), None);
    }

    fn confirm_schema() -> ValidationSchema {
        ValidationSchema::new()
            .field(
                "secret",
                vec![Rule::required("secret missing"), Rule::password(8, "weak")],
            )
            .field(
                "confirm",
                vec![
                    Rule::required("confirm missing"),
                    Rule::min_length(8, "confirm short"),
                ],
            )
            .must_match("confirm", "secret", "no match")
    }

    #[test]
    fn cross_field_error_lands_on_the_confirming_field() {
        let probe = Probe {
            secret: "Abcdefg1!".to_string(),
            confirm: "different".to_string(),
            ..Probe::default()
        };
        let errors = confirm_schema().validate_form(&probe);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("confirm"), Some(&"no match".to_string()));
        assert!(!errors.contains_key("secret"));
    }

    #[test]
    fn cross_field_rule_waits_for_local_rules() {
        // The confirmation is too short: its local error is reported, not the mismatch.
        let probe = Probe {
            secret: "Abcdefg1!".to_string(),
            confirm: "diff".to_string(),
            ..Probe::default()
        };
        assert_eq!(
            confirm_schema().validate_field("confirm", &probe),
            Some("confirm short".to_string())
        );

        // The other side is locally invalid: no mismatch is reported on confirm.
        let probe = Probe {
            secret: "weak".to_string(),
            confirm: "different".to_string(),
            ..Probe::default()
        };
        assert_eq!(confirm_schema().validate_field("confirm", &probe), None);
    }

    #[test]
    fn matching_fields_validate() {
        let probe = Probe {
            secret: "Abcdefg1!".to_string(),
            confirm: "Abcdefg1!".to_string(),
            ..Probe::default()
        };
        assert!(confirm_schema().validate_form(&probe).is_empty());
    }

    #[test]
    fn validate_form_is_deterministic() {
        let probe = Probe::default();
        let schema = confirm_schema();
        let first = schema.validate_form(&probe);
        let second = schema.validate_form(&probe);
        assert_eq!(first, second);
        assert_eq!(
            first.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["confirm", "secret"]
        );
    }

    #[test]
    fn dependents_are_the_fields_whose_match_reads_the_edit() {
        let schema = confirm_schema();
        assert_eq!(schema.dependents_of("secret"), vec!["confirm"]);
        assert!(schema.dependents_of("confirm").is_empty());
    }

    #[test]
    fn blank_field_fails_local_rules() {
        let schema = confirm_schema();
        assert!(!schema.passes_local_rules("confirm", &Probe::default()));

        let probe = Probe {
            confirm: "long enough".to_string(),
            ..Probe::default()
        };
        assert!(schema.passes_local_rules("confirm", &probe));
    }

    #[test]
    fn unknown_fields_have_no_errors() {
        assert_eq!(confirm_schema().validate_field("nope", &Probe::default()), None);
    }

    #[test]
    fn set_field_rejects_wrong_kind() {
        let mut probe = Probe::default();
        assert!(probe.set_field("name", "ana".into()));
        assert!(!probe.set_field("name", true.into()));
        assert!(!probe.set_field("missing", "x".into()));
        assert_eq!(probe.name, "ana");
    }
}
