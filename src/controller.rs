//! The lookup-and-render pipeline.
//!
//! A lookup shows the loading transition, fetches the Pokémon, then its species
//! and evolution chain, records it in the recents list and paints every panel.
//! Only the newest lookup may touch the view; older ones notice through their
//! [`PipelineToken`] and stop.

use std::time::Duration;

use crate::error::Result;
use crate::fetch::DexApi;
use crate::models::Pokemon;
use crate::recents::{RecentsStore, DEFAULT_RECENTS};
use crate::sprite;
use crate::state::{Generation, Outcome, Phase, PipelineEvent, PipelineToken};
use crate::ui::View;

/// Length of the card fade; painting waits for it.
pub const FADE_DURATION: Duration = Duration::from_millis(300);

pub struct Controller<A> {
    api: A,
    recents: RecentsStore,
    generation: Generation,
    fade: Duration,
}

impl<A: DexApi> Controller<A> {
    pub fn new(api: A, recents: RecentsStore) -> Self {
        Self {
            api,
            recents,
            generation: Generation::new(),
            fade: FADE_DURATION,
        }
    }

    pub fn with_fade(mut self, fade: Duration) -> Self {
        self.fade = fade;
        self
    }

    pub fn generation(&self) -> &Generation {
        &self.generation
    }

    pub fn recents(&self) -> &RecentsStore {
        &self.recents
    }

    /// List shown at startup: the stored recents, or a fixed starter set.
    pub fn initial_list(&self) -> Vec<String> {
        let recents = self.recents.get();
        if recents.is_empty() {
            DEFAULT_RECENTS.iter().map(|s| s.to_string()).collect()
        } else {
            recents
        }
    }

    /// Reserve a token for a lookup about to start. Any earlier lookup is now stale.
    pub fn start(&self) -> PipelineToken {
        self.generation.next()
    }

    /// Start and run a lookup in one go.
    pub async fn lookup<V: View + Send>(&self, identifier: &str, view: &mut V) -> Outcome {
        if identifier.trim().is_empty() {
            log::warn!("lookup requested without an identifier");
            return Outcome::Rejected;
        }
        let token = self.start();
        self.run(token, identifier, view).await
    }

    /// Run a lookup under a token obtained from [`start`](Self::start).
    pub async fn run<V: View + Send>(
        &self,
        token: PipelineToken,
        identifier: &str,
        view: &mut V,
    ) -> Outcome {
        let identifier = identifier.trim().to_lowercase();
        if identifier.is_empty() {
            log::warn!("lookup requested without an identifier");
            return Outcome::Rejected;
        }

        let mut phase = advance(Phase::Idle, PipelineEvent::Start);
        if !self.generation.is_current(token) {
            return Outcome::Superseded;
        }
        view.show_loading(true);
        tokio::time::sleep(self.fade).await;

        let outcome = match self.load(token, &identifier, view).await {
            Ok(Some(p)) => {
                phase = advance(phase, PipelineEvent::Succeeded);
                log::info!("showing {} (#{})", p.name, p.id);
                Outcome::Rendered { name: p.name, id: p.id }
            }
            Ok(None) => {
                log::debug!("lookup of {} superseded", identifier);
                return Outcome::Superseded;
            }
            Err(e) => {
                phase = advance(phase, PipelineEvent::Failed);
                log::error!("lookup of {} failed: {}", identifier, e);
                if !self.generation.is_current(token) {
                    return Outcome::Superseded;
                }
                let message = e.user_message();
                view.render_error(&message);
                view.select_recent(None);
                Outcome::Failed { message }
            }
        };

        if self.generation.is_current(token) {
            view.show_loading(false);
        }
        advance(phase, PipelineEvent::Finish);
        outcome
    }

    /// Fetch and paint. `Ok(None)` means a newer lookup took over midway.
    async fn load<V: View + Send>(
        &self,
        token: PipelineToken,
        identifier: &str,
        view: &mut V,
    ) -> Result<Option<Pokemon>> {
        let pokemon = self.api.fetch_pokemon(identifier).await?;
        let extras = self.api.fetch_species_and_evolution(pokemon.id).await;
        if !self.generation.is_current(token) {
            return Ok(None);
        }

        if let Err(e) = self.recents.add(&pokemon.name) {
            log::warn!("could not record {} in recents: {}", pokemon.name, e);
        }
        view.render_recents(&self.recents.get());

        let image = sprite::preload(&self.api, &pokemon).await;
        if !self.generation.is_current(token) {
            return Ok(None);
        }
        view.render_card(&pokemon, image.into_thumb());
        view.render_evolution(&extras.evolution);
        view.render_species(extras.species.as_ref());
        view.select_recent(Some(&pokemon.name));
        Ok(Some(pokemon))
    }
}

fn advance(phase: Phase, event: PipelineEvent) -> Phase {
    phase.on(event).unwrap_or_else(|| {
        log::error!("invalid pipeline transition {:?} on {:?}", event, phase);
        phase
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DexError;
    use crate::models::{EvolutionStage, Generation as Gen, Species, SpeciesAndEvolution, Stat};
    use crate::state::ViewState;
    use crate::ui::{App, NOT_FOUND_ID, NOT_FOUND_NAME};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    #[derive(Default)]
    struct FakeApi {
        pokemon: HashMap<String, Pokemon>,
        species: HashMap<u32, SpeciesAndEvolution>,
        calls: AtomicUsize,
        fetch_delay: Duration,
        image_delay: Duration,
    }

    impl FakeApi {
        fn with(mut self, p: Pokemon, extras: SpeciesAndEvolution) -> Self {
            self.species.insert(p.id, extras);
            self.pokemon.insert(p.name.clone(), p);
            self
        }
    }

    impl DexApi for FakeApi {
        async fn fetch_pokemon(&self, identifier: &str) -> Result<Pokemon> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.fetch_delay).await;
            self.pokemon
                .get(identifier)
                .cloned()
                .ok_or_else(|| DexError::NotFound {
                    identifier: identifier.to_string(),
                })
        }

        async fn fetch_species_and_evolution(&self, id: u32) -> SpeciesAndEvolution {
            self.species.get(&id).cloned().unwrap_or_default()
        }

        async fn fetch_image(&self, url: &str) -> Result<Vec<u8>> {
            tokio::time::sleep(self.image_delay).await;
            Err(DexError::MalformedResource {
                url: url.to_string(),
            })
        }
    }

    fn pokemon(name: &str, id: u32) -> Pokemon {
        Pokemon {
            name: name.to_string(),
            id,
            types: vec!["electric".to_string()],
            abilities: vec!["static".to_string()],
            stats: vec![Stat { name: "hp".to_string(), base: 35 }],
            ..Default::default()
        }
    }

    fn species(name: &str) -> Species {
        Species {
            name: name.to_string(),
            generation: Gen::I,
            is_legendary: false,
            is_mythical: false,
            flavor_texts: vec![],
            evolution_chain_url: None,
        }
    }

    fn controller(api: FakeApi) -> (TempDir, Controller<FakeApi>) {
        let dir = TempDir::new().unwrap();
        let store = RecentsStore::new(dir.path().join("recents.json"));
        (dir, Controller::new(api, store).with_fade(Duration::ZERO))
    }

    #[tokio::test]
    async fn test_successful_lookup_renders_everything() {
        let api = FakeApi::default().with(
            pokemon("pikachu", 25),
            SpeciesAndEvolution {
                species: Some(species("pikachu")),
                evolution: vec![
                    EvolutionStage { name: "pichu".to_string(), id: 172 },
                    EvolutionStage { name: "pikachu".to_string(), id: 25 },
                ],
            },
        );
        let (_dir, ctl) = controller(api);
        ctl.recents().add("bulbasaur").unwrap();
        let mut app = App::new();

        let outcome = ctl.lookup("  PIKACHU ", &mut app).await;

        assert_eq!(outcome, Outcome::Rendered { name: "pikachu".to_string(), id: 25 });
        assert_eq!(app.card.id_label, "#025");
        assert_eq!(app.stats.get("HP"), Some("35"));
        assert_eq!(app.recents, vec!["pikachu", "bulbasaur"]);
        assert_eq!(app.active_recent, Some(0));
        assert_eq!(app.species.region, "Kanto");
        assert_eq!(app.evolution.lines().len(), 2);
        assert!(!app.loading);
    }

    #[tokio::test]
    async fn test_degraded_species_still_renders() {
        let api = FakeApi::default()
            .with(pokemon("missingno", 0), SpeciesAndEvolution::unavailable());
        let (_dir, ctl) = controller(api);
        let mut app = App::new();

        let outcome = ctl.lookup("missingno", &mut app).await;

        assert!(matches!(outcome, Outcome::Rendered { .. }));
        assert_eq!(app.species.region, "N/A");
        assert_eq!(app.evolution.lines(), vec![crate::ui::EVOLUTION_UNAVAILABLE]);
    }

    #[tokio::test]
    async fn test_unknown_pokemon_fails_without_touching_recents() {
        let (_dir, ctl) = controller(FakeApi::default());
        ctl.recents().add("mew").unwrap();
        let mut app = App::new();
        app.render_recents(&ctl.recents().get());
        app.select_recent(Some("mew"));

        let outcome = ctl.lookup("notapokemon", &mut app).await;

        assert_eq!(
            outcome,
            Outcome::Failed { message: "Pokémon não encontrado".to_string() }
        );
        assert_eq!(app.card.name, NOT_FOUND_NAME);
        assert_eq!(app.card.id_label, NOT_FOUND_ID);
        assert_eq!(app.active_recent, None);
        assert_eq!(ctl.recents().get(), vec!["mew"]);
        assert!(matches!(app.status, ViewState::Error(_)));
        assert!(!app.loading);
    }

    #[tokio::test]
    async fn test_empty_identifier_is_rejected() {
        let (_dir, ctl) = controller(FakeApi::default());
        let mut app = App::new();
        assert_eq!(ctl.lookup("   ", &mut app).await, Outcome::Rejected);
        assert_eq!(ctl.api.calls.load(Ordering::SeqCst), 0);
        assert_eq!(app.status, ViewState::Idle);
    }

    #[tokio::test]
    async fn test_stale_token_leaves_view_alone() {
        let api = FakeApi::default()
            .with(pokemon("pikachu", 25), SpeciesAndEvolution::unavailable());
        let (_dir, ctl) = controller(api);
        let mut app = App::new();

        let stale = ctl.start();
        let _newer = ctl.start();
        let outcome = ctl.run(stale, "pikachu", &mut app).await;

        assert_eq!(outcome, Outcome::Superseded);
        assert_eq!(app.status, ViewState::Idle);
        assert!(app.card.name.is_empty());
    }

    #[tokio::test]
    async fn test_newer_lookup_during_fetch_supersedes() {
        let api = FakeApi {
            fetch_delay: Duration::from_millis(100),
            ..Default::default()
        }
        .with(pokemon("pikachu", 25), SpeciesAndEvolution::unavailable());
        let (_dir, ctl) = controller(api);
        ctl.recents().add("mew").unwrap();
        let mut app = App::new();

        let token = ctl.start();
        let (outcome, _) = tokio::join!(ctl.run(token, "pikachu", &mut app), async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            ctl.start()
        });

        assert_eq!(outcome, Outcome::Superseded);
        assert!(app.card.name.is_empty());
        assert!(app.recents.is_empty());
        assert_eq!(app.active_recent, None);
        assert_eq!(ctl.recents().get(), vec!["mew"]);
    }

    #[tokio::test]
    async fn test_newer_lookup_during_image_preload_supersedes() {
        let mut p = pokemon("pikachu", 25);
        p.artwork_url = Some("art".to_string());
        let api = FakeApi {
            image_delay: Duration::from_millis(100),
            ..Default::default()
        }
        .with(p, SpeciesAndEvolution::unavailable());
        let (_dir, ctl) = controller(api);
        let mut app = App::new();

        let token = ctl.start();
        let (outcome, _) = tokio::join!(ctl.run(token, "pikachu", &mut app), async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            ctl.start()
        });

        assert_eq!(outcome, Outcome::Superseded);
        assert!(app.card.name.is_empty());
        assert_eq!(app.active_recent, None);
        assert!(!matches!(app.status, ViewState::Loaded { .. }));
    }

    #[test]
    fn test_initial_list_defaults() {
        let (_dir, ctl) = controller(FakeApi::default());
        assert_eq!(ctl.initial_list(), DEFAULT_RECENTS.to_vec());
        ctl.recents().add("mew").unwrap();
        assert_eq!(ctl.initial_list(), vec!["mew"]);
    }
}
