//! Buyer-entered checkout fields.

use serde::{Deserialize, Serialize};

use dev_books_core::{Email, EmailError};

/// Fields collected on the checkout form.
///
/// Deserializes directly from the posted form (`customerName`, `email`,
/// `address`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutForm {
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
}

/// A single editable form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    CustomerName,
    Email,
    Address,
}

impl FormField {
    /// All fields in form order.
    pub const ALL: [Self; 3] = [Self::CustomerName, Self::Email, Self::Address];

    /// HTML `name` attribute.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CustomerName => "customerName",
            Self::Email => "email",
            Self::Address => "address",
        }
    }
}

/// Why a field was rejected by [`CheckoutForm::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: FormField,
    pub message: String,
}

impl CheckoutForm {
    /// Current value of `field`.
    #[must_use]
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::CustomerName => &self.customer_name,
            FormField::Email => &self.email,
            FormField::Address => &self.address,
        }
    }

    /// Overwrite `field` with `value`, unvalidated.
    pub fn set(&mut self, field: FormField, value: String) {
        match field {
            FormField::CustomerName => self.customer_name = value,
            FormField::Email => self.email = value,
            FormField::Address => self.address = value,
        }
    }

    /// Required-field and email-shape check done by the submitting surface.
    ///
    /// This is the server-side counterpart of the browser's `required` and
    /// `type="email"` attributes. The checkout controller itself never calls
    /// it.
    ///
    /// # Errors
    ///
    /// Returns one [`FieldError`] per offending field, in form order.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        if self.customer_name.trim().is_empty() {
            errors.push(FieldError {
                field: FormField::CustomerName,
                message: "Please enter your full name.".to_string(),
            });
        }

        match Email::parse(self.email.trim()) {
            Ok(_) => {}
            Err(EmailError::Empty) => errors.push(FieldError {
                field: FormField::Email,
                message: "Please enter your email address.".to_string(),
            }),
            Err(e) => errors.push(FieldError {
                field: FormField::Email,
                message: format!("Please enter a valid email address ({e})."),
            }),
        }

        if self.address.trim().is_empty() {
            errors.push(FieldError {
                field: FormField::Address,
                message: "Please enter a shipping address.".to_string(),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> CheckoutForm {
        CheckoutForm {
            customer_name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            address: "12 Analytical Row, London".to_string(),
        }
    }

    #[test]
    fn test_valid_form() {
        assert_eq!(filled().validate(), Ok(()));
    }

    #[test]
    fn test_empty_form_reports_every_field_in_order() {
        let errors = CheckoutForm::default().validate().unwrap_err();
        let fields: Vec<FormField> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, FormField::ALL.to_vec());
    }

    #[test]
    fn test_whitespace_only_is_empty() {
        let mut form = filled();
        form.address = "   \n".to_string();
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, FormField::Address);
    }

    #[test]
    fn test_malformed_email() {
        let mut form = filled();
        form.email = "ada.example.com".to_string();
        let errors = form.validate().unwrap_err();
        assert_eq!(errors[0].field, FormField::Email);
        assert!(errors[0].message.contains('@'));
    }

    #[test]
    fn test_get_and_set_round_trip_per_field() {
        let mut form = CheckoutForm::default();
        for field in FormField::ALL {
            form.set(field, format!("value for {}", field.name()));
        }
        assert_eq!(form.get(FormField::Email), "value for email");
        assert_eq!(form.customer_name, "value for customerName");
    }

    #[test]
    fn test_deserializes_from_posted_form_names() {
        let form: CheckoutForm = serde_json::from_value(serde_json::json!({
            "customerName": "Ada",
            "email": "ada@example.com"
        }))
        .unwrap_or_default();
        assert_eq!(form.customer_name, "Ada");
        assert_eq!(form.address, "");
    }
}
