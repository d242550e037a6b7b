use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{errors::ValidationErrorMap, schema::Validator};

/// The four inputs of the registration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Name,
    Username,
    Password,
    ConfirmPassword,
}

impl Field {
    pub const ALL: [Field; 4] = [
        Field::Name,
        Field::Username,
        Field::Password,
        Field::ConfirmPassword,
    ];

    /// Key of the field on the wire and in a [`ValidationErrorMap`].
    pub fn name(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Username => "username",
            Field::Password => "password",
            Field::ConfirmPassword => "confirm_password",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Username => "Username",
            Field::Password => "Password",
            Field::ConfirmPassword => "Confirm Password",
        }
    }

    pub fn is_secret(&self) -> bool {
        matches!(self, Field::Password | Field::ConfirmPassword)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Record submitted to the signup endpoint.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormValues {
    pub name: String,
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

impl FormValues {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Username => &self.username,
            Field::Password => &self.password,
            Field::ConfirmPassword => &self.confirm_password,
        }
    }
}

impl fmt::Debug for FormValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormValues")
            .field("name", &self.name)
            .field("username", &self.username)
            .field("password", &"REDACTED")
            .field("confirm_password", &"REDACTED")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Value<T> {
    pub value: T,
    pub warning: Option<String>,
    pub valid: bool,
}

impl std::default::Default for Value<String> {
    fn default() -> Self {
        Self {
            value: "".to_string(),
            warning: None,
            valid: true,
        }
    }
}

/// Input state of the registration form, owned by one form instance.
#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub name: Value<String>,
    pub username: Value<String>,
    pub password: Value<String>,
    pub confirm_password: Value<String>,
}

impl SignupForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self, field: Field) -> &Value<String> {
        match field {
            Field::Name => &self.name,
            Field::Username => &self.username,
            Field::Password => &self.password,
            Field::ConfirmPassword => &self.confirm_password,
        }
    }

    fn value_mut(&mut self, field: Field) -> &mut Value<String> {
        match field {
            Field::Name => &mut self.name,
            Field::Username => &mut self.username,
            Field::Password => &mut self.password,
            Field::ConfirmPassword => &mut self.confirm_password,
        }
    }

    /// Store a new input. The warning stays until the next [`SignupForm::validate`].
    pub fn on_update(&mut self, field: Field, value: String) {
        let input = self.value_mut(field);
        input.value = value;
        input.valid = true;
    }

    pub fn values(&self) -> FormValues {
        FormValues {
            name: self.name.value.clone(),
            username: self.username.value.clone(),
            password: self.password.value.clone(),
            confirm_password: self.confirm_password.value.clone(),
        }
    }

    /// Run the schema over the current inputs and write each field's warning.
    pub fn validate<V: Validator + ?Sized>(
        &mut self,
        validator: &V,
    ) -> Result<FormValues, ValidationErrorMap> {
        let values = self.values();
        let result = validator.validate(&values);
        let errors = result.as_ref().err();
        for field in Field::ALL {
            let warning = errors.and_then(|e| e.get(field)).map(str::to_string);
            let input = self.value_mut(field);
            input.valid = warning.is_none();
            input.warning = warning;
        }
        result.map(|_| values)
    }

    /// Inline messages for a field: the local warning, then the remote entry
    /// stored under the field's own name. Identical text is shown once.
    pub fn messages<'a>(
        &'a self,
        field: Field,
        remote: Option<&'a ValidationErrorMap>,
    ) -> Vec<&'a str> {
        let mut messages = Vec::with_capacity(2);
        if let Some(warning) = self.value(field).warning.as_deref() {
            messages.push(warning);
        }
        if let Some(entry) = remote.and_then(|errors| errors.get(field)) {
            if !messages.contains(&entry) {
                messages.push(entry);
            }
        }
        messages
    }

    pub fn is_valid(&self) -> bool {
        Field::ALL.iter().all(|f| self.value(*f).valid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SignupFormSchema;

    fn filled() -> SignupForm {
        let mut form = SignupForm::new();
        form.on_update(Field::Name, "Ada Lovelace".to_string());
        form.on_update(Field::Username, "ada".to_string());
        form.on_update(Field::Password, "correct horse".to_string());
        form.on_update(Field::ConfirmPassword, "correct horse".to_string());
        form
    }

    #[test]
    fn field_names_match_wire_keys() {
        let names: Vec<_> = Field::ALL.iter().map(|f| f.name()).collect();
        assert_eq!(names, ["name", "username", "password", "confirm_password"]);
    }

    #[test]
    fn form_values_serialize_with_field_names() {
        let values = filled().values();
        let json = serde_json::to_value(&values).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "Ada Lovelace",
                "username": "ada",
                "password": "correct horse",
                "confirm_password": "correct horse",
            })
        );
    }

    #[test]
    fn debug_redacts_passwords() {
        let debug = format!("{:?}", filled().values());
        assert!(debug.contains("ada"));
        assert!(!debug.contains("correct horse"));
    }

    #[test]
    fn validate_writes_and_clears_warnings() {
        let mut form = filled();
        form.on_update(Field::ConfirmPassword, "something else".to_string());
        assert!(form.validate(&SignupFormSchema).is_err());
        assert!(!form.confirm_password.valid);
        assert!(form.confirm_password.warning.is_some());
        assert!(form.name.valid);
        assert!(form.name.warning.is_none());

        form.on_update(Field::ConfirmPassword, "correct horse".to_string());
        let values = form.validate(&SignupFormSchema).unwrap();
        assert_eq!(values.username, "ada");
        assert!(form.confirm_password.warning.is_none());
        assert!(form.is_valid());
    }

    #[test]
    fn messages_are_looked_up_by_own_field_name() {
        let form = filled();
        let remote: ValidationErrorMap = [
            ("username", "taken"),
            ("password", "too short"),
            ("confirm_password", "mismatch"),
        ]
        .into_iter()
        .collect();
        assert_eq!(form.messages(Field::Password, Some(&remote)), vec!["too short"]);
        assert_eq!(
            form.messages(Field::ConfirmPassword, Some(&remote)),
            vec!["mismatch"]
        );
        assert_eq!(form.messages(Field::Username, Some(&remote)), vec!["taken"]);
        assert!(form.messages(Field::Name, Some(&remote)).is_empty());
        assert!(form.messages(Field::Password, None).is_empty());
    }

    #[test]
    fn local_warning_and_remote_entry_are_both_shown() {
        let mut form = filled();
        form.on_update(Field::Username, "a".to_string());
        let _ = form.validate(&SignupFormSchema);
        let remote: ValidationErrorMap = [("username", "taken")].into_iter().collect();
        let messages = form.messages(Field::Username, Some(&remote));
        assert_eq!(messages.len(), 2);
        assert_ne!(messages[0], "taken");
        assert_eq!(messages[1], "taken");
    }

    #[test]
    fn same_text_from_both_sources_is_shown_once() {
        let mut form = filled();
        form.on_update(Field::Username, "a".to_string());
        let local = form.validate(&SignupFormSchema).unwrap_err();
        let messages = form.messages(Field::Username, Some(&local));
        assert_eq!(messages.len(), 1);
    }
}
