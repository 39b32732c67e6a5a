/// The NAS instance every fetch is scoped to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetInstance {
    pub identifier: String,
    pub region: String,
}

impl TargetInstance {
    pub fn new(identifier: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            region: region.into(),
        }
    }

    /// Label values for the value gauges, in `{instance, region}` order.
    pub fn label_values(&self) -> Vec<String> {
        vec![self.identifier.clone(), self.region.clone()]
    }
}
