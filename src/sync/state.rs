use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Locally held copy of one entity collection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewState<T> {
    pub data: Vec<T>,
    /// True while any fetch for this binding is in flight
    pub loading: bool,
    pub error: Option<String>,
    pub phase: Phase,
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            loading: false,
            error: None,
            phase: Phase::Idle,
        }
    }
}

impl<T> ViewState<T> {
    pub fn begin_fetch(&mut self) {
        self.loading = true;
        self.phase = Phase::Loading;
    }

    /// Success replaces `data` wholesale; failure leaves it untouched
    pub fn complete_fetch<E: ToString>(&mut self, outcome: Result<Vec<T>, E>, still_loading: bool) {
        match outcome {
            Ok(data) => {
                self.data = data;
                self.error = None;
                self.phase = Phase::Ready;
            }
            Err(e) => {
                self.error = Some(e.to_string());
                self.phase = Phase::Failed;
            }
        }
        self.loading = still_loading;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_keeps_previous_data() {
        let mut state = ViewState::default();
        state.begin_fetch();
        state.complete_fetch::<String>(Ok(vec![1, 2, 3]), false);

        state.begin_fetch();
        state.complete_fetch(Err("network down"), false);

        assert_eq!(state.data, vec![1, 2, 3]);
        assert_eq!(state.error.as_deref(), Some("network down"));
        assert_eq!(state.phase, Phase::Failed);
        assert!(!state.loading);
    }

    #[test]
    fn test_success_clears_error() {
        let mut state: ViewState<u8> = ViewState::default();
        state.complete_fetch(Err("boom"), false);
        state.complete_fetch::<String>(Ok(vec![]), true);

        assert_eq!(state.error, None);
        assert_eq!(state.phase, Phase::Ready);
        assert!(state.loading);
    }
}
