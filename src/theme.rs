use std::collections::BTreeMap;

/// Opaque style tokens resolved by an upstream theme service. Layout attaches
/// them to the output untouched; each placed node carries a `style_ref` key
/// that the rendering runtime resolves against this set.
pub type StyleTokens = BTreeMap<String, String>;

/// Style-reference keys emitted by the layout algorithms.
pub mod roles {
    pub const TOPIC: &str = "topic";
    pub const ATTRIBUTE: &str = "attribute";
    pub const BOUNDARY: &str = "boundary";
    pub const CONCEPT: &str = "concept";
    pub const PART: &str = "part";
    pub const SUBPART: &str = "subpart";
    pub const BRACE: &str = "brace";
    pub const STEP: &str = "step";
    pub const SUBSTEP: &str = "substep";
    pub const EVENT: &str = "event";
    pub const CAUSE: &str = "cause";
    pub const EFFECT: &str = "effect";
    pub const FOCUS: &str = "focus";
    pub const SHARED: &str = "shared";
    pub const UNIQUE: &str = "unique";
    pub const BRANCH: &str = "branch";
    pub const CHILD: &str = "child";
}
