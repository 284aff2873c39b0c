//! Form payloads for the auth workflows.
//!
//! Every field defaults to an empty string so an absent form field never
//! rejects the request shape; the workflows report precise validation
//! failures instead.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Member sign-up form as posted by the browser.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct SignupForm {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub secret_code: String,
    pub join_year: String,
    pub phone_number: String,
    pub profession: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct ForgotPasswordForm {
    pub email: String,
    #[serde(alias = "callbackUrl")]
    pub callback_url: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct ResetPasswordForm {
    pub password: String,
    #[serde(alias = "confirmPassword")]
    pub confirm_password: String,
}

/// Query parameters of the provider's redirect back to the site.
#[derive(IntoParams, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub redirect_to: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn signup_form_defaults_missing_fields_to_empty() -> Result<()> {
        let form: SignupForm = serde_json::from_str(r#"{"email":"jean@exemple.com"}"#)?;
        assert_eq!(form.email, "jean@exemple.com");
        assert_eq!(form.password, "");
        assert_eq!(form.secret_code, "");
        assert_eq!(form.join_year, "");
        Ok(())
    }

    #[test]
    fn forgot_password_accepts_camel_case_callback() -> Result<()> {
        let form: ForgotPasswordForm =
            serde_json::from_str(r#"{"email":"a@b.c","callbackUrl":"/retour"}"#)?;
        assert_eq!(form.callback_url, "/retour");
        Ok(())
    }

    #[test]
    fn reset_password_accepts_camel_case_confirmation() -> Result<()> {
        let form: ResetPasswordForm =
            serde_json::from_str(r#"{"password":"p","confirmPassword":"p"}"#)?;
        assert_eq!(form.confirm_password, "p");
        Ok(())
    }
}
