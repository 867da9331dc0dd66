//! Tipo de erro unificado do engine com formatação estável.
use core::fmt;
use std::collections::BTreeMap;

use serde_json::{json, Map, Value};

use crate::amm::error_catalog::{default_locale_message, AmmErrorCode};

const CONTEXT_VALUE_MAX: usize = 256;

fn sanitize_value(input: &str) -> String {
    let cleaned: String = input
        .chars()
        .map(|ch| match ch {
            '\n' | '\r' | '\t' => ' ',
            _ => ch,
        })
        .collect();
    if cleaned.chars().count() > CONTEXT_VALUE_MAX {
        let mut truncated: String = cleaned.chars().take(CONTEXT_VALUE_MAX - 1).collect();
        truncated.push('…');
        truncated
    } else {
        cleaned
    }
}

fn render_template(template: &str, context: &BTreeMap<String, String>) -> String {
    let mut rendered = String::with_capacity(template.len());
    let mut chars = template.chars();
    while let Some(ch) = chars.next() {
        if ch != '{' {
            rendered.push(ch);
            continue;
        }
        let mut key = String::new();
        for next in chars.by_ref() {
            if next == '}' {
                break;
            }
            key.push(next);
        }
        match context.get(&key) {
            Some(value) if !key.is_empty() => rendered.push_str(value),
            _ => {
                rendered.push('{');
                rendered.push_str(&key);
                rendered.push('}');
            }
        }
    }
    rendered
}

/// Erro do engine com contexto estruturado.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmmError {
    pub code: AmmErrorCode,
    pub context: BTreeMap<String, String>,
}

impl AmmError {
    /// Cria um novo erro sem contexto adicional.
    pub fn new(code: AmmErrorCode) -> Self {
        Self {
            code,
            context: BTreeMap::new(),
        }
    }

    /// Adiciona um par chave/valor ao contexto.
    pub fn with_context<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: ToString,
    {
        let key_string = key.into();
        if !key_string.is_empty() {
            let sanitized = sanitize_value(&value.to_string());
            self.context.insert(key_string, sanitized);
        }
        self
    }

    fn resolved_message(&self) -> String {
        render_template(default_locale_message(self.code), &self.context)
    }

    /// Mensagem curta para UI.
    pub fn to_user_string(&self) -> String {
        format!("[{}] {}", self.code.code(), self.resolved_message())
    }

    /// Renderiza um template arbitrário usando o contexto atual.
    pub fn render_with_template(&self, template: &str) -> String {
        render_template(template, &self.context)
    }

    /// Serialização estável em JSON para logs (chaves do contexto em ordem).
    pub fn to_log_json(&self) -> String {
        let context: Map<String, Value> = self
            .context
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        json!({
            "code": self.code.code(),
            "title": self.code.title(),
            "message": self.resolved_message(),
            "context": context,
        })
        .to_string()
    }
}

impl fmt::Display for AmmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_user_string())
    }
}

impl std::error::Error for AmmError {}

/// Resultado padrão para operações do engine.
pub type Result<T> = std::result::Result<T, AmmError>;

#[macro_export]
macro_rules! amm_err {
  ($code:expr) => {{
    $crate::amm::error::AmmError::new($code)
  }};
  ($code:expr, $($key:ident => $value:expr),+ $(,)?) => {{
    let mut err = $crate::amm::error::AmmError::new($code);
    $(
      err = err.with_context(stringify!($key), $value);
    )+
    err
  }};
  ($code:expr, { $($key:expr => $value:expr),+ $(,)? }) => {{
    let mut err = $crate::amm::error::AmmError::new($code);
    $(
      err = err.with_context($key, $value);
    )+
    err
  }};
}

#[macro_export]
macro_rules! amm_bail {
  ($($tt:tt)*) => {
    return Err($crate::amm_err!($($tt)*))
  };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_string_basic() {
        let err = AmmError::new(AmmErrorCode::ZeroAmount);
        assert_eq!(err.to_user_string(), "[AMM-0001] amount deve ser > 0");
    }

    #[test]
    fn catalog_placeholders_resolve() {
        let err = amm_err!(AmmErrorCode::MaxSpreadExceeded, spread => "0.71", max_spread => "0.01");
        assert_eq!(
            err.to_user_string(),
            "[AMM-0007] spread 0.71 acima do máximo 0.01"
        );
    }

    #[test]
    fn placeholder_subst() {
        let err = AmmError::new(AmmErrorCode::ArithmeticOverflow).with_context("detalhe", "valor");
        assert_eq!(err.render_with_template("falha {detalhe}"), "falha valor");
        assert_eq!(err.render_with_template("falha {}"), "falha {}");
    }

    #[test]
    fn log_json_shape() {
        let err = AmmError::new(AmmErrorCode::PoolNotInitialized).with_context("reserve", "0");
        let parsed: Value = serde_json::from_str(&err.to_log_json()).unwrap();
        assert_eq!(parsed["code"], "AMM-0002");
        assert_eq!(parsed["title"], AmmErrorCode::PoolNotInitialized.title());
        assert_eq!(parsed["context"]["reserve"], "0");
        assert!(parsed["message"].is_string());
    }

    #[test]
    fn macros_variants() {
        let err = amm_err!(AmmErrorCode::ZeroAmount, amount => 0);
        assert_eq!(err.code, AmmErrorCode::ZeroAmount);
        assert_eq!(err.context.get("amount").unwrap(), "0");

        let err_block = amm_err!(AmmErrorCode::PoolNotInitialized, { "reserve" => 0 });
        assert_eq!(err_block.code, AmmErrorCode::PoolNotInitialized);
        assert_eq!(err_block.context.get("reserve").unwrap(), "0");
    }

    #[test]
    fn bail_returns_err() {
        fn guarded(x: u128) -> Result<u128> {
            if x == 0 {
                amm_bail!(AmmErrorCode::ZeroAmount, amount => x);
            }
            Ok(x)
        }
        assert_eq!(guarded(0).unwrap_err().code, AmmErrorCode::ZeroAmount);
        assert_eq!(guarded(7).unwrap(), 7);
    }
}
