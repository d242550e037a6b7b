use crate::{
    errors::ValidationErrorMap,
    form::{Field, FormValues},
};

const NAME_MIN_LEN: usize = 2;
const USERNAME_MIN_LEN: usize = 3;
const USERNAME_MAX_LEN: usize = 32;
const PASSWORD_MIN_LEN: usize = 8;

/// Client-side gate run before any request is dispatched.
pub trait Validator {
    fn validate(&self, values: &FormValues) -> Result<(), ValidationErrorMap>;
}

impl<F> Validator for F
where
    F: Fn(&FormValues) -> Result<(), ValidationErrorMap>,
{
    fn validate(&self, values: &FormValues) -> Result<(), ValidationErrorMap> {
        self(values)
    }
}

/// Default rules of the registration form.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignupFormSchema;

impl Validator for SignupFormSchema {
    fn validate(&self, values: &FormValues) -> Result<(), ValidationErrorMap> {
        let mut errors = ValidationErrorMap::new();

        if values.name.trim().chars().count() < NAME_MIN_LEN {
            errors.insert(
                Field::Name,
                format!("Name must be at least {} characters long.", NAME_MIN_LEN),
            );
        }

        let username_len = values.username.chars().count();
        if username_len < USERNAME_MIN_LEN {
            errors.insert(
                Field::Username,
                format!(
                    "Username must be at least {} characters long.",
                    USERNAME_MIN_LEN
                ),
            );
        } else if username_len > USERNAME_MAX_LEN {
            errors.insert(
                Field::Username,
                format!(
                    "Username must be at most {} characters long.",
                    USERNAME_MAX_LEN
                ),
            );
        } else if !values
            .username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            errors.insert(
                Field::Username,
                "Username may only contain letters, numbers, '_' and '-'.",
            );
        }

        if values.password.chars().count() < PASSWORD_MIN_LEN {
            errors.insert(
                Field::Password,
                format!(
                    "Password must be at least {} characters long.",
                    PASSWORD_MIN_LEN
                ),
            );
        }

        if values.confirm_password != values.password {
            errors.insert(Field::ConfirmPassword, "Passwords don't match.");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
