//! Terminal front-end: walks the wizard on a line-oriented reader/writer.
//!
//! Any prompt accepts `<` to go back one step. Entered values are shown as
//! defaults when a step is revisited, and an empty answer keeps them.

use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};

use crate::api::{AqiCategory, CityRecord, ReferenceData, ReferenceDataCache};
use crate::error::Result;
use crate::results::{ResultBundle, render_bundle};
use crate::submission::SubmissionPipeline;
use crate::wizard::model::{AGE_MAX, AGE_MIN, DISTANCE_MAX_KM, DISTANCE_MIN_KM};
use crate::wizard::{FamilyType, HealthCondition, ProfileFormState, WizardStep};

/// Typed at any prompt to return to the previous step.
const BACK: &str = "<";

/// What the user chose at the end of a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StepOutcome {
    Next,
    Back,
}

/// Line-based prompt over any async reader/writer pair.
pub struct WizardPrompt<R, W> {
    lines: Lines<R>,
    out: W,
}

impl<R, W> WizardPrompt<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, out: W) -> Self {
        Self {
            lines: reader.lines(),
            out,
        }
    }

    pub fn into_writer(self) -> W {
        self.out
    }

    async fn say(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes()).await?;
        self.out.write_all(b"\n").await?;
        self.out.flush().await
    }

    /// Ask once; `None` means the user typed `<`.
    async fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.out.write_all(prompt.as_bytes()).await?;
        self.out.flush().await?;
        match self.lines.next_line().await? {
            Some(line) => {
                let line = line.trim().to_string();
                Ok(if line == BACK { None } else { Some(line) })
            }
            None => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed before the wizard finished",
            )),
        }
    }

    /// Pick one of `options` by number or exact name. An empty answer keeps
    /// `current` when it is set.
    async fn choose(
        &mut self,
        label: &str,
        options: &[String],
        annotations: &[String],
        current: &str,
    ) -> io::Result<Option<String>> {
        for (i, option) in options.iter().enumerate() {
            let note = annotations.get(i).map(String::as_str).unwrap_or("");
            self.say(&format!("  {:>2}. {option}{note}", i + 1)).await?;
        }
        loop {
            let prompt = if current.is_empty() {
                format!("{label}: ")
            } else {
                format!("{label} [{current}]: ")
            };
            let Some(answer) = self.ask(&prompt).await? else {
                return Ok(None);
            };
            if answer.is_empty() && !current.is_empty() {
                return Ok(Some(current.to_string()));
            }
            if let Ok(n) = answer.parse::<usize>() {
                if let Some(option) = n.checked_sub(1).and_then(|i| options.get(i)) {
                    return Ok(Some(option.clone()));
                }
            }
            if let Some(option) = options.iter().find(|o| o.eq_ignore_ascii_case(&answer)) {
                return Ok(Some(option.clone()));
            }
            self.say("  Pick a number from the list.").await?;
        }
    }

    /// Ask for a number; empty keeps `current`, garbage re-asks.
    async fn ask_number(&mut self, prompt: &str, current: i64) -> io::Result<Option<i64>> {
        loop {
            let Some(answer) = self.ask(&format!("{prompt} [{current}]: ")).await? else {
                return Ok(None);
            };
            if answer.is_empty() {
                return Ok(Some(current));
            }
            match answer.parse::<i64>() {
                Ok(n) => return Ok(Some(n)),
                Err(_) => self.say("  Enter a whole number.").await?,
            }
        }
    }

    // ── Steps ──────────────────────────────────────────────────────────

    async fn identity_step(
        &mut self,
        form: &mut ProfileFormState,
        professions: &[String],
    ) -> io::Result<StepOutcome> {
        loop {
            let current = form.profile.name.clone();
            let prompt = if current.is_empty() {
                "Full name: ".to_string()
            } else {
                format!("Full name [{current}]: ")
            };
            let Some(name) = self.ask(&prompt).await? else {
                return Ok(StepOutcome::Back);
            };
            if !name.is_empty() {
                form.set_name(name);
            }
            if !form.profile.name.trim().is_empty() {
                break;
            }
            self.say("  Name is required.").await?;
        }

        let prompt = format!("Age ({AGE_MIN}-{AGE_MAX})");
        let Some(age) = self.ask_number(&prompt, i64::from(form.profile.age)).await? else {
            return Ok(StepOutcome::Back);
        };
        form.set_age(age.clamp(i64::from(AGE_MIN), i64::from(AGE_MAX)) as u8);

        self.say("Profession:").await?;
        let current = form.profile.profession.clone();
        let Some(profession) = self.choose("Profession", professions, &[], &current).await? else {
            return Ok(StepOutcome::Back);
        };
        form.set_profession(profession);

        Ok(StepOutcome::Next)
    }

    async fn location_step(
        &mut self,
        form: &mut ProfileFormState,
        city_names: &[String],
        cities: &[CityRecord],
    ) -> io::Result<StepOutcome> {
        let annotations: Vec<String> = city_names
            .iter()
            .map(|name| {
                cities
                    .iter()
                    .find(|c| &c.city_name == name)
                    .map(|c| {
                        format!(
                            " (AQI {}, {})",
                            c.current_aqi,
                            AqiCategory::from_aqi(c.current_aqi)
                        )
                    })
                    .unwrap_or_default()
            })
            .collect();

        self.say("Current city:").await?;
        let current = form.location.current_city.clone();
        let Some(city) = self
            .choose("Current city", city_names, &annotations, &current)
            .await?
        else {
            return Ok(StepOutcome::Back);
        };
        form.set_current_city(city);

        let prompt = format!("Maximum migration distance in km ({DISTANCE_MIN_KM}-{DISTANCE_MAX_KM})");
        let current = i64::from(form.location.max_distance_km);
        let Some(km) = self.ask_number(&prompt, current).await? else {
            return Ok(StepOutcome::Back);
        };
        form.set_max_distance_km(
            km.clamp(i64::from(DISTANCE_MIN_KM), i64::from(DISTANCE_MAX_KM)) as u32,
        );

        let current = form.location.monthly_budget.clone();
        let prompt = if current.is_empty() {
            "Monthly budget in ₹ (blank for no limit): ".to_string()
        } else {
            format!("Monthly budget in ₹ [{current}] (- to remove): ")
        };
        let Some(budget) = self.ask(&prompt).await? else {
            return Ok(StepOutcome::Back);
        };
        match budget.as_str() {
            "" => {}
            "-" => form.set_monthly_budget(""),
            _ => form.set_monthly_budget(budget),
        }

        Ok(StepOutcome::Next)
    }

    async fn family_step(&mut self, form: &mut ProfileFormState) -> io::Result<StepOutcome> {
        self.say("Family type:").await?;
        let labels: Vec<String> = FamilyType::ALL.iter().map(|t| t.label().to_string()).collect();
        let current = form.family_health.family_type.label();
        let Some(choice) = self.choose("Family type", &labels, &[], current).await? else {
            return Ok(StepOutcome::Back);
        };
        if let Some(family_type) = FamilyType::ALL.iter().find(|t| t.label() == choice) {
            form.set_family_type(*family_type);
        }

        let counts = [
            ("Total family members (1-20)", form.family_health.total_members),
            ("Children under 12 (0-10)", form.family_health.children),
            ("Elderly above 60 (0-10)", form.family_health.elderly),
        ];
        for (i, (prompt, current)) in counts.into_iter().enumerate() {
            let Some(answer) = self.ask(&format!("{prompt} [{current}]: ")).await? else {
                return Ok(StepOutcome::Back);
            };
            if answer.is_empty() {
                continue;
            }
            match i {
                0 => form.set_total_members_input(&answer),
                1 => form.set_children_input(&answer),
                _ => form.set_elderly_input(&answer),
            }
        }

        loop {
            self.say("Health conditions in the family:").await?;
            for (i, condition) in HealthCondition::ALL.iter().enumerate() {
                let mark = if form.family_health.health_conditions.contains(*condition) {
                    "x"
                } else {
                    " "
                };
                self.say(&format!(
                    "  [{mark}] {:>2}. {} - {}",
                    i + 1,
                    condition.label(),
                    condition.description()
                ))
                .await?;
            }
            let Some(answer) = self.ask("Toggle by number (blank when done): ").await? else {
                return Ok(StepOutcome::Back);
            };
            if answer.is_empty() {
                break;
            }
            match answer
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| HealthCondition::ALL.get(i))
            {
                Some(condition) => form.toggle_health_condition(*condition),
                None => self.say("  Pick a number from the list.").await?,
            }
        }

        Ok(StepOutcome::Next)
    }

    /// Walk the steps until the user confirms submission.
    pub async fn run_wizard(
        &mut self,
        form: &mut ProfileFormState,
        reference: &ReferenceData,
        cities: &[CityRecord],
    ) -> io::Result<()> {
        loop {
            let step = form.step;
            self.say(&format!(
                "\nStep {} of {}: {}",
                step.index() + 1,
                WizardStep::ALL.len(),
                step.title()
            ))
            .await?;

            let outcome = match step {
                WizardStep::Identity => self.identity_step(form, &reference.professions).await?,
                WizardStep::Location => {
                    self.location_step(form, &reference.city_names, cities).await?
                }
                WizardStep::FamilyHealth => self.family_step(form).await?,
            };

            match outcome {
                StepOutcome::Back => {
                    if let Err(e) = form.back() {
                        self.say(&format!("  {e}")).await?;
                    }
                }
                StepOutcome::Next if step.is_terminal() => {
                    match self.ask("Submit your assessment? [Y/n]: ").await? {
                        None => {}
                        Some(answer) if answer.is_empty() || answer.eq_ignore_ascii_case("y") => {
                            return Ok(());
                        }
                        Some(_) => {}
                    }
                }
                StepOutcome::Next => {
                    if let Err(e) = form.advance() {
                        self.say(&format!("  {e}")).await?;
                    }
                }
            }
        }
    }
}

/// Full front-end flow: load options, run the wizard, submit, show results.
///
/// Returns `Ok(None)` when the user declines to retry a failed submission.
pub async fn run<R, W>(
    prompt: &mut WizardPrompt<R, W>,
    reference_cache: &ReferenceDataCache,
    pipeline: &SubmissionPipeline,
) -> Result<Option<ResultBundle>>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let (reference, cities) =
        futures::future::join(reference_cache.load(), reference_cache.cities()).await;

    let mut form = ProfileFormState::new();
    prompt.run_wizard(&mut form, &reference, &cities).await?;

    loop {
        prompt
            .say("\nAnalysis in progress: scoring cities and preparing your advisory...")
            .await?;
        match pipeline.submit(&form).await {
            Ok(bundle) => {
                prompt.say("").await?;
                prompt.say(&render_bundle(&bundle)).await?;
                return Ok(Some(bundle));
            }
            Err(e) if e.is_retryable() => {
                prompt.say(&format!("Could not prepare your results: {e}")).await?;
                let answer = prompt.ask("Try again? [Y/n]: ").await?;
                if !matches!(answer.as_deref(), Some("") | Some("y") | Some("Y")) {
                    pipeline.reset().await;
                    return Ok(None);
                }
            }
            Err(e) => {
                prompt.say(&format!("Please review your answers: {e}")).await?;
                pipeline.reset().await;
                prompt.run_wizard(&mut form, &reference, &cities).await?;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::api::RecommendationClient;
    use crate::api::types::{AdvisoryRequest, AdvisoryResult, RecommendationResult};
    use crate::error::ApiError;
    use crate::results::MemoryResultStore;
    use crate::wizard::MigrationRequest;

    async fn drive(script: &str, reference: &ReferenceData) -> (ProfileFormState, String) {
        let mut prompt = WizardPrompt::new(script.as_bytes(), Vec::new());
        let mut form = ProfileFormState::new();
        prompt.run_wizard(&mut form, reference, &[]).await.unwrap();
        let output = String::from_utf8(prompt.into_writer()).unwrap();
        (form, output)
    }

    fn reference() -> ReferenceData {
        ReferenceData {
            city_names: vec!["Delhi".into(), "Mumbai".into(), "Shimla".into()],
            professions: vec!["IT/Software".into(), "Healthcare".into()],
        }
    }

    #[tokio::test]
    async fn walks_all_steps_with_numbers_and_names() {
        let script = "Amit\n34\n1\n\
                      delhi\n500\n20000\n\
                      1\n4\n1\n0\n2\n\n\
                      y\n";
        let (form, _) = drive(script, &reference()).await;
        assert_eq!(form.profile.name, "Amit");
        assert_eq!(form.profile.age, 34);
        assert_eq!(form.profile.profession, "IT/Software");
        assert_eq!(form.location.current_city, "Delhi");
        assert_eq!(form.location.monthly_budget, "20000");
        assert_eq!(form.family_health.family_type, FamilyType::NuclearFamily);
        assert_eq!(
            form.family_health.health_conditions.as_slice(),
            &[HealthCondition::Asthma]
        );
        assert_eq!(form.to_request().monthly_budget, Some(20000));
    }

    #[tokio::test]
    async fn empty_name_is_reasked() {
        let script = "\n  \nPriya\n\n2\n3\n\n\n\n\n\n\n\n\n\n";
        let (form, output) = drive(script, &reference()).await;
        assert_eq!(form.profile.name, "Priya");
        assert_eq!(form.profile.profession, "Healthcare");
        assert_eq!(form.location.current_city, "Shimla");
        assert!(output.contains("Name is required."));
    }

    #[tokio::test]
    async fn back_revisits_with_values_kept() {
        // Fill identity, go back from the city prompt, keep everything, continue.
        let script = "Amit\n40\n2\n\
                      <\n\
                      \n\n\n\
                      3\n\n\n\
                      \n\n\n\n\n\
                      \n";
        let (form, output) = drive(script, &reference()).await;
        assert_eq!(form.profile.name, "Amit");
        assert_eq!(form.profile.age, 40);
        assert_eq!(form.profile.profession, "Healthcare");
        assert_eq!(form.location.current_city, "Shimla");
        assert!(output.contains("Full name [Amit]: "));
        assert!(output.matches("Step 1 of 3").count() >= 2);
    }

    #[tokio::test]
    async fn garbage_counts_fall_back_to_defaults() {
        let script = "Amit\n\n1\n1\n\n\n\nmany\nnone\nx\n\n\n";
        let (form, _) = drive(script, &reference()).await;
        assert_eq!(form.family_health.total_members, 1);
        assert_eq!(form.family_health.children, 0);
        assert_eq!(form.family_health.elderly, 0);
    }

    #[tokio::test]
    async fn closed_input_is_an_error() {
        let mut prompt = WizardPrompt::new("Amit\n".as_bytes(), Vec::new());
        let mut form = ProfileFormState::new();
        let err = prompt
            .run_wizard(&mut form, &reference(), &[])
            .await
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    struct OfflineApi;

    #[async_trait::async_trait]
    impl crate::api::AirSafeApi for OfflineApi {
        async fn city_names(&self) -> std::result::Result<Vec<String>, ApiError> {
            Err(offline())
        }
        async fn professions(&self) -> std::result::Result<Vec<String>, ApiError> {
            Err(offline())
        }
        async fn cities(&self) -> std::result::Result<Vec<CityRecord>, ApiError> {
            Err(offline())
        }
        async fn recommend(
            &self,
            _request: &MigrationRequest,
        ) -> std::result::Result<RecommendationResult, ApiError> {
            Err(offline())
        }
        async fn advise(
            &self,
            _request: &AdvisoryRequest,
        ) -> std::result::Result<AdvisoryResult, ApiError> {
            Err(offline())
        }
    }

    fn offline() -> ApiError {
        ApiError::Transport {
            endpoint: "offline".into(),
            reason: "network unreachable".into(),
        }
    }

    fn offline_setup() -> (ReferenceDataCache, SubmissionPipeline) {
        let api: Arc<dyn crate::api::AirSafeApi> = Arc::new(OfflineApi);
        let timeout = Duration::from_secs(1);
        let cache = ReferenceDataCache::new(Arc::clone(&api), timeout);
        let client = RecommendationClient::new(api, timeout);
        let pipeline = SubmissionPipeline::new(client, Arc::new(MemoryResultStore::new()));
        (cache, pipeline)
    }

    #[tokio::test]
    async fn offline_run_submits_and_renders() {
        let (cache, pipeline) = offline_setup();
        let script = "Amit\n34\n1\n1\n500\n20000\n1\n4\n1\n0\n2\n\ny\n";
        let mut prompt = WizardPrompt::new(script.as_bytes(), Vec::new());

        let bundle = run(&mut prompt, &cache, &pipeline).await.unwrap().unwrap();
        assert_eq!(bundle.profile.profession, "IT/Software");
        assert_eq!(bundle.location.current_city, "Delhi");
        assert_eq!(bundle.recommendations.top().unwrap().city_name, "Shimla");

        let output = String::from_utf8(prompt.into_writer()).unwrap();
        assert!(output.contains("1. Shimla, Himachal Pradesh"));
    }

    #[tokio::test]
    async fn run_reports_closed_input() {
        let (cache, pipeline) = offline_setup();
        let mut prompt = WizardPrompt::new("Amit\n".as_bytes(), Vec::new());
        let err = run(&mut prompt, &cache, &pipeline).await.unwrap_err();
        assert!(err.is_input_closed());
        assert_eq!(pipeline.status().await, crate::submission::SubmissionStatus::Editing);
    }
}
