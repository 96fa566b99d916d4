pub struct Icons;

impl Icons {
    pub const ROCKET: &str = "🚀";
    pub const CHECK: &str = "✅";
    pub const CROSS: &str = "❌";
    pub const STATS: &str = "📊";
    pub const LINK: &str = "🔗";
    pub const FILE: &str = "📄";
    pub const CODE: &str = "🧩";
    pub const GEAR: &str = "⚙️";
    pub const CLOCK: &str = "⏱️";
    pub const PACKAGE: &str = "📦";
}
