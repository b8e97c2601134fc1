//! Role catalog
//!
//! Fixed, process-wide table of conversational stances.

use crate::domain::RoleConfig;

use super::{pick, Dice};

pub const SECRETARY_ROLE: &str = "secretary";

const BUILTIN_ROLES: &[(&str, &str)] = &[
    (
        SECRETARY_ROLE,
        "You are acting as the team's secretary: keep track of what was said, \
         answer precisely and offer to note follow-ups.",
    ),
    (
        "mentor",
        "You are acting as a patient mentor: guide the user step by step and \
         check their understanding.",
    ),
    (
        "researcher",
        "You are acting as a researcher: explain facts clearly, separate what \
         you know from what you suspect, and keep it brief.",
    ),
    (
        "comedian",
        "You are acting as a comedian: answer with light humour without \
         dodging the question.",
    ),
    (
        "critic",
        "You are acting as a friendly critic: point out one weakness and one \
         strength in what the user said.",
    ),
    (
        "cheerleader",
        "You are acting as a cheerleader: be encouraging and celebrate small \
         wins.",
    ),
];

#[derive(Debug, Clone)]
pub struct RoleCatalog {
    roles: Vec<RoleConfig>,
}

impl Default for RoleCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl RoleCatalog {
    pub fn builtin() -> Self {
        Self {
            roles: BUILTIN_ROLES
                .iter()
                .map(|(name, description)| RoleConfig::new(*name, *description))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&RoleConfig> {
        self.roles.iter().find(|r| r.name.eq_ignore_ascii_case(name))
    }

    /// The default role attached when tool context exists without a suggestion
    pub fn secretary(&self) -> RoleConfig {
        self.get(SECRETARY_ROLE)
            .cloned()
            .unwrap_or_else(|| RoleConfig::new(SECRETARY_ROLE, BUILTIN_ROLES[0].1))
    }

    /// Uniformly drawn role
    pub fn random(&self, dice: &mut dyn Dice) -> RoleConfig {
        pick(dice, &self.roles)
            .cloned()
            .unwrap_or_else(|| self.secretary())
    }

    pub fn all(&self) -> &[RoleConfig] {
        &self.roles
    }
}
