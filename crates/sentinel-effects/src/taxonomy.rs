// SPDX-License-Identifier: MIT OR Apache-2.0
//! The effect-type taxonomy: base severity and permanence per type.

use sentinel_types::{EffectType, Permanence, Severity};

/// Base (severity, permanence) for an effect type, before composition.
pub fn base_profile(effect_type: EffectType) -> (Severity, Permanence) {
    use EffectType::*;
    match effect_type {
        PermissionGrant => (Severity::High, Permanence::PermanentUntilRevoked),
        PermissionRevoke => (Severity::Low, Permanence::Immediate),
        AssetTransfer => (Severity::High, Permanence::ImmediateIrreversible),
        ControlTransfer => (Severity::Critical, Permanence::Permanent),
        UpgradeAuthority => (Severity::Critical, Permanence::Permanent),
        ExecutionGrant => (Severity::Critical, Permanence::PermanentUntilRevoked),
        BatchOperation => (Severity::High, Permanence::Varies),
        SafeExecution => (Severity::High, Permanence::Immediate),
        SafeModuleChange => (Severity::Critical, Permanence::PermanentUntilRevoked),
        SafeModuleExecution => (Severity::Critical, Permanence::Immediate),
        SafeOwnerChange => (Severity::Critical, Permanence::PermanentUntilChanged),
        SafeThresholdChange => (Severity::Critical, Permanence::PermanentUntilChanged),
        SafeFallbackChange => (Severity::High, Permanence::PermanentUntilChanged),
        SafeGuardChange => (Severity::Critical, Permanence::PermanentUntilChanged),
        DelegatecallExecution => (Severity::Critical, Permanence::Immediate),
        TrustProfileSemantic => (Severity::ContextDependent, Permanence::ContextDependent),
        AbiVerified => (Severity::ContextDependent, Permanence::ContextDependent),
        Unknown => (Severity::Unknown, Permanence::Unknown),
    }
}
