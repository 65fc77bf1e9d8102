use std::fmt;

use serde::{Deserialize, Serialize};

use super::{address::Address, is_blank};
use crate::error::{DomainError, Result};

/// Login form as posted by the browser, before validation.
#[derive(Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: Option<String>,

    #[serde(rename = "senha", default)]
    pub password: Option<String>,
}

impl LoginForm {
    pub fn into_credentials(self) -> Result<Credentials> {
        let email = required(self.email, "Email é obrigatório", "Email não pode ser vazio")?;
        let password = required(self.password, "Senha é obrigatória", "Senha não pode ser vazia")?;
        Ok(Credentials { email, password })
    }
}

/// Validated login credentials, serialized as the upstream expects them.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,

    #[serde(rename = "senha")]
    pub password: String,
}

impl Credentials {
    /// Display name used when the upstream does not return one.
    pub fn fallback_name(&self) -> &str {
        self.email.split('@').next().unwrap_or(&self.email)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[HIDDEN]")
            .finish()
    }
}

/// Registration form as posted by the browser, before validation.
#[derive(Default, Deserialize)]
pub struct RegistrationForm {
    #[serde(rename = "nome", default)]
    pub name: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(rename = "telefone", default)]
    pub phone: Option<String>,

    #[serde(rename = "senha", default)]
    pub password: Option<String>,

    #[serde(rename = "endereco", default)]
    pub address: Option<Address>,
}

impl RegistrationForm {
    pub fn into_registration(self) -> Result<Registration> {
        let name = required(self.name, "Nome é obrigatório", "Nome não pode ser vazio")?;
        let email = required(self.email, "Email é obrigatório", "Email não pode ser vazio")?;
        let password = required(self.password, "Senha é obrigatória", "Senha não pode ser vazia")?;
        let address = self.address.ok_or_else(|| {
            DomainError::invalid("Endereço é obrigatório", "Endereço não pode ser nulo")
        })?;

        Ok(Registration {
            name,
            email,
            phone: self.phone,
            password,
            address,
        })
    }
}

/// A validated registration, reshaped to exactly the fields the upstream
/// accepts.
#[derive(Clone, Serialize)]
pub struct Registration {
    #[serde(rename = "nome")]
    pub name: String,

    pub email: String,

    #[serde(rename = "telefone", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(rename = "senha")]
    pub password: String,

    #[serde(rename = "endereco")]
    pub address: Address,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("phone", &self.phone)
            .field("password", &"[HIDDEN]")
            .field("address", &self.address)
            .finish()
    }
}

/// What the browser keeps after a successful login.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    pub token_type: String,

    pub expires_in: u64,

    pub message: String,

    pub nome: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Session {
    pub const DEFAULT_TOKEN_TYPE: &'static str = "Bearer";
    pub const DEFAULT_EXPIRES_IN: u64 = 86_400;
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("nome", &self.nome)
            .finish_non_exhaustive()
    }
}

fn required(value: Option<String>, message: &str, error: &str) -> Result<String> {
    if is_blank(value.as_deref()) {
        return Err(DomainError::invalid(message, error));
    }
    Ok(value.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registration(body: serde_json::Value) -> Result<Registration> {
        serde_json::from_value::<RegistrationForm>(body)
            .unwrap()
            .into_registration()
    }

    #[test]
    fn blank_name_is_rejected_first() {
        let err = registration(json!({
            "nome": "",
            "email": "a@b.com",
            "senha": "x1",
            "endereco": { "logradouro": "Rua A" }
        }))
        .unwrap_err();

        assert_eq!(
            err,
            DomainError::Validation {
                message: "Nome é obrigatório".into(),
                errors: vec!["Nome não pode ser vazio".into()],
            }
        );
    }

    #[test]
    fn address_is_mandatory_for_registration() {
        let err = registration(json!({ "nome": "Ana", "email": "a@b.com", "senha": "x1" })).unwrap_err();
        assert!(matches!(
            err,
            DomainError::Validation { errors, .. } if errors == vec!["Endereço não pode ser nulo".to_string()]
        ));
    }

    #[test]
    fn registration_is_reshaped_for_the_upstream() {
        let reg = registration(json!({
            "nome": "Ana",
            "email": "ana@exemplo.com",
            "telefone": "11999990000",
            "senha": "segredo",
            "confirmarSenha": "segredo",
            "endereco": { "logradouro": "Rua A", "bairro": "Centro", "tipoConstrucao": "mista" }
        }))
        .unwrap();

        assert_eq!(
            serde_json::to_value(&reg).unwrap(),
            json!({
                "nome": "Ana",
                "email": "ana@exemplo.com",
                "telefone": "11999990000",
                "senha": "segredo",
                "endereco": { "logradouro": "Rua A", "bairro": "Centro", "tipoConstrucao": "MISTA" }
            })
        );
        assert!(!format!("{reg:?}").contains("segredo"));
    }

    #[test]
    fn login_requires_email_then_password() {
        let missing_email = LoginForm {
            email: Some("  ".into()),
            password: Some("x".into()),
        };
        assert!(matches!(
            missing_email.into_credentials(),
            Err(DomainError::Validation { message, .. }) if message == "Email é obrigatório"
        ));

        let missing_password = LoginForm {
            email: Some("a@b.com".into()),
            password: None,
        };
        assert!(matches!(
            missing_password.into_credentials(),
            Err(DomainError::Validation { errors, .. }) if errors == vec!["Senha não pode ser vazia".to_string()]
        ));
    }

    #[test]
    fn fallback_name_is_the_local_part() {
        let credentials = LoginForm {
            email: Some("maria.silva@exemplo.com".into()),
            password: Some("x".into()),
        }
        .into_credentials()
        .unwrap();
        assert_eq!(credentials.fallback_name(), "maria.silva");
    }
}
