//! Process-wide hint registry.
//!
//! Maps each registered hint type to the hint (and version) this build reads.
//! Decoders consult it before trusting a `_hint` from the wire.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use isaac_types::{Hint, HintType};

use crate::error::BallotError;
use crate::hints::BUILTIN;

#[derive(Clone, Debug)]
pub struct RegisteredHint {
    pub hint: Hint,
    pub name: &'static str,
}

#[derive(Clone, Debug, Default)]
pub struct HintRegistry {
    entries: HashMap<HintType, RegisteredHint>,
}

/// The registry of built-in hints, populated on first use and never mutated.
pub static REGISTRY: Lazy<HintRegistry> = Lazy::new(HintRegistry::builtin);

impl HintRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in ballot hint.
    pub fn builtin() -> Self {
        let entries = BUILTIN
            .iter()
            .map(|(hint, name)| {
                (
                    hint.ty().clone(),
                    RegisteredHint {
                        hint: hint.clone(),
                        name: *name,
                    },
                )
            })
            .collect();
        Self { entries }
    }

    /// Register `hint` under `name`. A type can be registered only once.
    pub fn register(&mut self, hint: Hint, name: &'static str) -> Result<(), BallotError> {
        if let Some(existing) = self.entries.get(hint.ty()) {
            return Err(BallotError::IncompatibleHint(format!(
                "hint type {} already registered as {:?}",
                hint.ty(),
                existing.name
            )));
        }
        self.entries
            .insert(hint.ty().clone(), RegisteredHint { hint, name });
        Ok(())
    }

    pub fn get(&self, ty: &HintType) -> Option<&RegisteredHint> {
        self.entries.get(ty)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check that an incoming (writer) hint can be read by this registry.
    pub fn resolve(&self, writer: &Hint) -> Result<&RegisteredHint, BallotError> {
        let entry = self.entries.get(writer.ty()).ok_or_else(|| {
            BallotError::IncompatibleHint(format!("unknown hint type {}", writer.ty()))
        })?;
        Hint::is_compatible(writer, &entry.hint)?;
        Ok(entry)
    }

    /// Parse a hint string from the wire and resolve it.
    pub fn decode(&self, text: &str) -> Result<Hint, BallotError> {
        let hint: Hint = text
            .parse()
            .map_err(|e: isaac_types::TypeError| BallotError::IncompatibleHint(e.to_string()))?;
        self.resolve(&hint)?;
        Ok(hint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::hints;

    #[test]
    fn builtin_registry_knows_every_ballot_hint() {
        assert_eq!(REGISTRY.len(), hints::BUILTIN.len());
        let entry = REGISTRY.resolve(&hints::VOTEPROOF).unwrap();
        assert_eq!(entry.name, "voteproof");
    }

    #[test]
    fn duplicate_type_rejected() {
        let mut registry = HintRegistry::new();
        registry.register(hints::PROPOSAL, "proposal").unwrap();
        let err = registry
            .register("proposal-v0.0.2".parse().unwrap(), "again")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IncompatibleHint);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn decode_checks_compatibility() {
        assert_eq!(REGISTRY.decode("proposal-v0.0.1").unwrap(), hints::PROPOSAL);
        // A newer patch from the writer is readable.
        assert!(REGISTRY.decode("proposal-v0.0.7").is_ok());
        // A different major is not.
        let err = REGISTRY.decode("proposal-v1.0.0").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IncompatibleHint);
        // Neither is an unknown type or garbage.
        assert!(REGISTRY.decode("block-v0.0.1").is_err());
        assert!(REGISTRY.decode("no version").is_err());
    }
}
