//! Effects - side effects declared by the reducer

/// Side effects that can be triggered by actions
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Fetch the city feed (once, when the general list mounts)
    LoadCities { url: String },
    /// Resolve the user's position (once, when the map mounts)
    Locate { url: String },
}
