/// Events emitted by a claim registry during operations.
///
/// These events are passed to the tracing callback set via
/// `ClaimRegistry::set_trace_callback`. Events carry the value type's name
/// rather than the condition key itself, so tracing works for any key type
/// without extra trait bounds.
///
/// # Examples
///
/// ```rust
/// use claim_guard::ClaimEvent;
///
/// let event = ClaimEvent::Claim { type_name: "i32", granted: true };
/// println!("{:?}", event);
/// ```
#[derive(Debug, Clone)]
pub enum ClaimEvent {
    /// A claim attempt completed.
    Claim {
        /// The guarded value type (e.g., "i32", "alloc::string::String")
        type_name: &'static str,
        /// Whether the condition key was registered
        granted: bool,
    },

    /// A claim was released.
    Release {
        /// The guarded value type
        type_name: &'static str,
    },

    /// A condition presence check was performed.
    Contains {
        /// The guarded value type
        type_name: &'static str,
        /// Whether the condition key was found
        found: bool,
    },
}

impl std::fmt::Display for ClaimEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClaimEvent::Claim { type_name, granted } => {
                write!(
                    f,
                    "claim {{ type_name: {}, granted: {} }}",
                    type_name, granted
                )
            }
            ClaimEvent::Release { type_name } => {
                write!(f, "release {{ type_name: {} }}", type_name)
            }
            ClaimEvent::Contains { type_name, found } => {
                write!(
                    f,
                    "contains {{ type_name: {}, found: {} }}",
                    type_name, found
                )
            }
        }
    }
}

/// Type alias for the user-supplied tracing callback.
///
/// The callback receives a reference to a `ClaimEvent` every time its
/// registry is interacted with. It must be thread-safe because registries
/// are shared across threads.
pub type TraceCallback = dyn Fn(&ClaimEvent) + Send + Sync + 'static;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_event_display() {
        let event = ClaimEvent::Claim {
            type_name: "i32",
            granted: true,
        };
        assert_eq!(event.to_string(), "claim { type_name: i32, granted: true }");

        let event = ClaimEvent::Release {
            type_name: "String",
        };
        assert_eq!(event.to_string(), "release { type_name: String }");

        let event = ClaimEvent::Contains {
            type_name: "u8",
            found: false,
        };
        assert_eq!(event.to_string(), "contains { type_name: u8, found: false }");
    }

    #[test]
    fn test_claim_event_clone() {
        let event = ClaimEvent::Claim {
            type_name: "i32",
            granted: false,
        };
        let cloned = event.clone();
        assert_eq!(format!("{:?}", event), format!("{:?}", cloned));
    }
}
