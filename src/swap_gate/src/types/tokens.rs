use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::infrastructure::errors::{Result, ValidationError};

const NATIVE_SENTINEL: &str = "native";
const ADDRESS_HEX_LEN: usize = 40;

// Chain location of a token
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TokenAddress {
    Native,
    Contract(String),  // 0x-prefixed, 20 bytes, never the zero address
}

impl TokenAddress {
    /// Accepts `"native"` or a non-zero `0x` + 40 hex digit address
    pub fn parse(raw: &str) -> std::result::Result<Self, String> {
        if raw == NATIVE_SENTINEL {
            return Ok(TokenAddress::Native);
        }

        let digits = raw
            .strip_prefix("0x")
            .ok_or_else(|| format!("address '{}' must start with 0x", raw))?;

        if digits.len() != ADDRESS_HEX_LEN {
            return Err(format!("address '{}' must have {} hex digits", raw, ADDRESS_HEX_LEN));
        }

        let bytes = hex::decode(digits).map_err(|e| format!("address '{}' is not hex: {}", raw, e))?;
        if bytes.iter().all(|b| *b == 0) {
            return Err("zero address is not a valid token".to_string());
        }

        Ok(TokenAddress::Contract(raw.to_string()))
    }

    pub fn is_native(&self) -> bool {
        matches!(self, TokenAddress::Native)
    }
}

impl fmt::Display for TokenAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenAddress::Native => f.write_str(NATIVE_SENTINEL),
            TokenAddress::Contract(address) => f.write_str(address),
        }
    }
}

impl TryFrom<String> for TokenAddress {
    type Error = String;

    fn try_from(raw: String) -> std::result::Result<Self, Self::Error> {
        TokenAddress::parse(&raw)
    }
}

impl From<TokenAddress> for String {
    fn from(address: TokenAddress) -> Self {
        address.to_string()
    }
}

// Immutable token metadata
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub symbol: String,
    pub name: String,
    pub address: TokenAddress,
    pub decimals: u32,
    pub icon: Option<String>,
    #[serde(default)]
    pub custom: bool,
}

impl Token {
    pub fn native(symbol: &str, name: &str, decimals: u32) -> Self {
        Self {
            symbol: symbol.to_string(),
            name: name.to_string(),
            address: TokenAddress::Native,
            decimals,
            icon: None,
            custom: false,
        }
    }

    /// Contract token; rejects malformed or zero addresses
    pub fn contract(symbol: &str, name: &str, address: &str, decimals: u32) -> Result<Self> {
        let address = TokenAddress::parse(address).map_err(|reason| ValidationError::InvalidToken {
            symbol: symbol.to_string(),
            reason,
        })?;

        Ok(Self {
            symbol: symbol.to_string(),
            name: name.to_string(),
            address,
            decimals,
            icon: None,
            custom: false,
        })
    }

    pub fn with_icon(mut self, icon: &str) -> Self {
        self.icon = Some(icon.to_string());
        self
    }

    pub fn as_custom(mut self) -> Self {
        self.custom = true;
        self
    }
}

/// Token metadata keyed by symbol, supplied by configuration
#[derive(Debug, Clone, Default)]
pub struct TokenRegistry {
    tokens: BTreeMap<String, Token>,
}

impl TokenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// ETH (native), USDC, APOM, MATIC
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for token in default_tokens() {
            registry.tokens.insert(token.symbol.clone(), token);
        }
        registry
    }

    /// Add or replace a token. Symbols must be non-empty.
    pub fn register(&mut self, token: Token) -> Result<()> {
        if token.symbol.trim().is_empty() {
            return Err(ValidationError::InvalidToken {
                symbol: token.symbol,
                reason: "symbol cannot be empty".to_string(),
            }
            .into());
        }
        self.tokens.insert(token.symbol.clone(), token);
        Ok(())
    }

    pub fn get(&self, symbol: &str) -> Option<&Token> {
        self.tokens.get(symbol)
    }

    pub fn require(&self, symbol: &str) -> Result<&Token> {
        self.get(symbol).ok_or_else(|| {
            ValidationError::UnknownToken { symbol: symbol.to_string() }.into()
        })
    }

    pub fn symbols(&self) -> Vec<String> {
        self.tokens.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

fn default_tokens() -> Vec<Token> {
    let mut tokens = vec![Token::native("ETH", "Ethereum", 18).with_icon("⟠")];

    // Literal addresses below are well-formed; a failure here is a typo in this table
    let contracts = [
        ("USDC", "USD Coin", "0xA0b86a33E6441b4b8bA4d8cC5E8E8E8E8E8E8E8E", 6, "💵"),
        ("APOM", "APOM Token", "0x1234567890123456789012345678901234567890", 18, "🪙"),
        ("MATIC", "Polygon", "0x0000000000000000000000000000000000001010", 18, "🟣"),
    ];
    for (symbol, name, address, decimals, icon) in contracts {
        match Token::contract(symbol, name, address, decimals) {
            Ok(token) => tokens.push(token.with_icon(icon)),
            Err(e) => log::error!("❌ Default token {} rejected: {}", symbol, e),
        }
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::errors::SwapGateError;

    #[test]
    fn test_default_registry() {
        let registry = TokenRegistry::with_defaults();
        assert_eq!(registry.len(), 4);
        assert!(registry.get("ETH").unwrap().address.is_native());
        assert_eq!(registry.get("USDC").unwrap().decimals, 6);
        assert_eq!(registry.get("APOM").unwrap().decimals, 18);
        assert_eq!(registry.get("MATIC").unwrap().decimals, 18);
        assert!(registry.get("DOGE").is_none());
    }

    #[test]
    fn test_address_validation() {
        assert_eq!(TokenAddress::parse("native"), Ok(TokenAddress::Native));
        assert!(TokenAddress::parse("0x1234567890123456789012345678901234567890").is_ok());
        assert!(TokenAddress::parse("0x0000000000000000000000000000000000000000").is_err());
        assert!(TokenAddress::parse("1234567890123456789012345678901234567890").is_err());
        assert!(TokenAddress::parse("0x12345").is_err());
        assert!(TokenAddress::parse("0xZZ34567890123456789012345678901234567890").is_err());
    }

    #[test]
    fn test_contract_token_rejects_zero_address() {
        let result = Token::contract("BAD", "Bad", "0x0000000000000000000000000000000000000000", 18);
        assert!(matches!(
            result,
            Err(SwapGateError::Validation(ValidationError::InvalidToken { .. }))
        ));
    }

    #[test]
    fn test_require_unknown_symbol() {
        let registry = TokenRegistry::with_defaults();
        assert!(matches!(
            registry.require("DOGE"),
            Err(SwapGateError::Validation(ValidationError::UnknownToken { .. }))
        ));
    }

    #[test]
    fn test_register_custom_token() {
        let mut registry = TokenRegistry::with_defaults();
        let token = Token::contract("CVERSE", "CryptoVerse Token", "0x00000000000000000000000000000000000000aa", 18)
            .unwrap()
            .as_custom();
        registry.register(token).unwrap();
        assert!(registry.get("CVERSE").unwrap().custom);
        assert_eq!(registry.symbols().len(), 5);
    }

    #[test]
    fn test_address_serializes_as_string() {
        let json = serde_json::to_string(&TokenAddress::Native).unwrap();
        assert_eq!(json, "\"native\"");
        let parsed: TokenAddress = serde_json::from_str("\"0x1234567890123456789012345678901234567890\"").unwrap();
        assert!(!parsed.is_native());
        assert!(serde_json::from_str::<TokenAddress>("\"0x00\"").is_err());
    }
}
