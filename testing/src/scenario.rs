//! Given-When-Then scenarios against a real detector.
//!
//! The detector is wired to [`geo_table`](crate::geo_table), an
//! [`InMemoryProfileStore`] and a [`RecordingSink`].

#![allow(clippy::module_name_repetitions)]

use login_risk_engine::mocks::RecordingSink;
use login_risk_engine::stores::InMemoryProfileStore;
use login_risk_engine::{
    DetectorConfig, LoginAttempt, ProfileStore, RiskAssessment, RiskDetector, UserProfile,
};

/// Type alias for assessment assertion functions
type AssessmentAssertion = Box<dyn FnOnce(&RiskAssessment)>;

/// Type alias for profile assertion functions
type ProfileAssertion = Box<dyn FnOnce(&UserProfile)>;

/// Type alias for assertions over every published assessment
type HistoryAssertion = Box<dyn FnOnce(&[RiskAssessment])>;

/// Fluent scenario runner.
///
/// # Example
///
/// ```ignore
/// ScenarioTest::new()
///     .given(AttemptBuilder::new("dana").at(t0))
///     .when(AttemptBuilder::new("dana").at(t1))
///     .then_assessment(|a| assert_eq!(a.factors.unusual_time, 0))
///     .then_profile(|p| assert_eq!(p.login_history.len(), 2))
///     .run()
///     .await;
/// ```
pub struct ScenarioTest {
    config: DetectorConfig,
    history: Vec<LoginAttempt>,
    attempt: Option<LoginAttempt>,
    assessment_assertions: Vec<AssessmentAssertion>,
    profile_assertions: Vec<ProfileAssertion>,
    history_assertions: Vec<HistoryAssertion>,
}

impl Default for ScenarioTest {
    fn default() -> Self {
        Self::new()
    }
}

impl ScenarioTest {
    /// Create a scenario with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: DetectorConfig::default(),
            history: Vec::new(),
            attempt: None,
            assessment_assertions: Vec::new(),
            profile_assertions: Vec::new(),
            history_assertions: Vec::new(),
        }
    }

    /// Use a custom configuration.
    #[must_use]
    pub fn with_config(mut self, config: DetectorConfig) -> Self {
        self.config = config;
        self
    }

    /// Add a prior attempt (Given). Analyzed in the order added.
    #[must_use]
    pub fn given(mut self, attempt: impl Into<LoginAttempt>) -> Self {
        self.history.push(attempt.into());
        self
    }

    /// Add several prior attempts (Given).
    #[must_use]
    pub fn given_all<I, A>(mut self, attempts: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<LoginAttempt>,
    {
        self.history.extend(attempts.into_iter().map(Into::into));
        self
    }

    /// Set the attempt under test (When).
    #[must_use]
    pub fn when(mut self, attempt: impl Into<LoginAttempt>) -> Self {
        self.attempt = Some(attempt.into());
        self
    }

    /// Assert on the assessment of the attempt under test (Then).
    #[must_use]
    pub fn then_assessment<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&RiskAssessment) + 'static,
    {
        self.assessment_assertions.push(Box::new(assertion));
        self
    }

    /// Assert on the stored profile of the attempt's user afterwards (Then).
    #[must_use]
    pub fn then_profile<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&UserProfile) + 'static,
    {
        self.profile_assertions.push(Box::new(assertion));
        self
    }

    /// Assert on every published assessment, history included (Then).
    #[must_use]
    pub fn then_published<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&[RiskAssessment]) + 'static,
    {
        self.history_assertions.push(Box::new(assertion));
        self
    }

    /// Run the scenario and execute all assertions.
    ///
    /// # Panics
    ///
    /// Panics if no attempt was set with [`when`](Self::when), if the
    /// configuration is invalid, if the store fails, or if any assertion
    /// fails.
    #[allow(clippy::panic)] // Test code can panic
    #[allow(clippy::expect_used)] // Test code can use expect
    pub async fn run(self) {
        crate::init_test_tracing();
        let attempt = self.attempt.expect("Attempt must be set with when()");

        let store = InMemoryProfileStore::new();
        let sink = RecordingSink::new();
        let detector = RiskDetector::new(self.config, crate::geo_table(), store.clone(), sink.clone())
            .expect("scenario configuration should be valid");

        for prior in &self.history {
            detector
                .analyze(prior)
                .await
                .expect("prior attempt should analyze");
        }

        let outcome = detector
            .analyze(&attempt)
            .await
            .expect("attempt under test should analyze");

        for assertion in self.assessment_assertions {
            assertion(&outcome.assessment);
        }

        if !self.profile_assertions.is_empty() {
            let profile = store
                .load(&attempt.user_id)
                .await
                .expect("store should be readable")
                .unwrap_or_else(|| panic!("no profile stored for {}", attempt.user_id));
            for assertion in self.profile_assertions {
                assertion(&profile);
            }
        }

        let published = sink.published();
        for assertion in self.history_assertions {
            assertion(&published);
        }
    }
}
