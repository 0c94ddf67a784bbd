//! Field checks for incoming transactions.
//!
//! The engine trusts its input, so every rule on the wire format lives here.

use api_types::transaction::TransactionPut;
use engine::NewTransaction;

use crate::ServerError;

/// Longest accepted transaction type.
pub const MAX_TYPE_LEN: usize = 64;

fn type_error(kind: Option<&str>) -> Option<&'static str> {
    let Some(kind) = kind else {
        return Some("may not be null");
    };
    if kind.is_empty() {
        return Some("may not be empty");
    }
    if kind.len() > MAX_TYPE_LEN {
        return Some("is too long");
    }
    if !kind.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Some("can only contain letters, numbers or underscore");
    }
    None
}

fn amount_error(amount: f64) -> Option<&'static str> {
    if !amount.is_finite() {
        return Some("must be a finite number");
    }
    if amount < 0.0 {
        return Some("must be greater than or equal to 0");
    }
    None
}

/// Turns a request body into an engine payload, listing every invalid field.
pub fn validate(payload: TransactionPut) -> Result<NewTransaction, ServerError> {
    let errors: Vec<String> = [
        ("type", type_error(payload.kind.as_deref())),
        ("amount", amount_error(payload.amount)),
    ]
    .into_iter()
    .filter_map(|(field, error)| error.map(|error| format!("[{field}] {error}")))
    .collect();

    if !errors.is_empty() {
        return Err(ServerError::Generic(format!(
            "Invalid request: {}",
            errors.join(", ")
        )));
    }

    let Some(kind) = payload.kind else {
        return Err(ServerError::Generic(
            "Invalid request: [type] may not be null".to_string(),
        ));
    };
    let mut new = NewTransaction::new(kind, payload.amount);
    new.parent_id = payload.parent_id.map(Into::into);
    Ok(new)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn put(kind: Option<&str>, amount: f64) -> TransactionPut {
        TransactionPut {
            kind: kind.map(str::to_string),
            amount,
            parent_id: None,
        }
    }

    fn message(result: Result<NewTransaction, ServerError>) -> String {
        match result {
            Err(ServerError::Generic(message)) => message,
            other => panic!("expected a validation error, got {other:?}"),
        }
    }

    #[test]
    fn accepts_valid_payload() {
        let mut payload = put(Some("cars_2"), 12.5);
        payload.parent_id = Some(3);

        let new = validate(payload).unwrap();
        assert_eq!(new.kind, "cars_2");
        assert_eq!(new.amount, 12.5);
        assert_eq!(new.parent_id, Some(engine::TransactionId::new(3)));
    }

    #[test]
    fn accepts_zero_amount() {
        assert!(validate(put(Some("cars"), 0.0)).is_ok());
    }

    #[test]
    fn rejects_bad_types() {
        assert_eq!(
            message(validate(put(None, 1.0))),
            "Invalid request: [type] may not be null"
        );
        assert_eq!(
            message(validate(put(Some(""), 1.0))),
            "Invalid request: [type] may not be empty"
        );
        assert_eq!(
            message(validate(put(Some("bad format"), 1.0))),
            "Invalid request: [type] can only contain letters, numbers or underscore"
        );
        let long = "a".repeat(MAX_TYPE_LEN + 1);
        assert_eq!(
            message(validate(put(Some(&long), 1.0))),
            "Invalid request: [type] is too long"
        );
    }

    #[test]
    fn rejects_bad_amounts() {
        assert_eq!(
            message(validate(put(Some("cars"), -1.0))),
            "Invalid request: [amount] must be greater than or equal to 0"
        );
        assert_eq!(
            message(validate(put(Some("cars"), f64::INFINITY))),
            "Invalid request: [amount] must be a finite number"
        );
    }

    #[test]
    fn reports_every_invalid_field() {
        assert_eq!(
            message(validate(put(Some(""), -1.0))),
            "Invalid request: [type] may not be empty, [amount] must be greater than or equal to 0"
        );
    }

    #[test]
    fn type_at_length_limit_is_accepted() {
        let kind = "a".repeat(MAX_TYPE_LEN);
        assert!(validate(put(Some(&kind), 1.0)).is_ok());
    }
}
