//! Session context tying the layout, the sequence library and the
//! controller channel together.
//!
//! Every layout mutation goes through [`Workbench::edit_layout`], which
//! persists a fresh snapshot once the edit succeeds.

use crate::{CommandSink, Config, MoonrakerSink, NoOpSink};
use anyhow::Context;
use labkit_core::{LayoutError, Result, SnapshotStore};
use labkit_layout::{LabLayout, LayoutSnapshot, Vec2};
use labkit_sequence::{
    MoveProfile, MoveTarget, Sequence, SequenceBuffer, SequenceGenerator, SequenceLibrary,
};
use labkit_settings::JsonFileStore;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

pub type LayoutStore = Box<dyn SnapshotStore<LayoutSnapshot>>;
pub type SequenceStore = Box<dyn SnapshotStore<Vec<Sequence>>>;

pub struct Workbench {
    config: Config,
    layout: LabLayout,
    layout_store: LayoutStore,
    library: SequenceLibrary,
    generator: SequenceGenerator,
    sink: Option<Arc<dyn CommandSink>>,
}

impl Workbench {
    /// Open the session using JSON files under the configured data directory
    pub fn open(config: Config) -> anyhow::Result<Self> {
        let storage = &config.storage;
        let layout_path = storage.layout_path()?;
        let sequences_path = storage.sequences_path()?;
        debug!(
            "Using layout {} and sequences {}",
            layout_path.display(),
            sequences_path.display()
        );
        let layout_store: LayoutStore =
            Box::new(JsonFileStore::<LayoutSnapshot>::new(layout_path));
        let sequence_store: SequenceStore =
            Box::new(JsonFileStore::<Vec<Sequence>>::new(sequences_path));
        Self::with_stores(config, layout_store, sequence_store)
            .context("Failed to open workbench data")
    }

    /// Open the session on explicit stores
    pub fn with_stores(
        config: Config,
        layout_store: LayoutStore,
        sequence_store: SequenceStore,
    ) -> Result<Self> {
        let settings = &config.layout;
        let mut layout = LabLayout::new();
        layout.set_min_bed_dimension(settings.min_bed_dimension);
        layout.set_clone_offset(Vec2::new(settings.clone_offset_x, settings.clone_offset_y));

        match layout_store.load()? {
            Some(snapshot) => layout.deserialize(snapshot)?,
            None => layout.update_area(settings.bed_width, settings.bed_height)?,
        }

        let library = SequenceLibrary::open(sequence_store)?;
        let motion = &config.motion;
        let generator = SequenceGenerator::new(MoveProfile {
            feed_xy: motion.feed_xy,
            feed_z: motion.feed_z,
            dwell_ms: motion.dwell_ms,
        });

        info!(
            "Workbench ready: {} objects, {} saved sequences",
            layout.len(),
            library.len()
        );
        Ok(Self {
            config,
            layout,
            layout_store,
            library,
            generator,
            sink: None,
        })
    }

    /// Send commands to `sink` instead of the configured Moonraker endpoint
    pub fn with_command_sink(mut self, sink: Arc<dyn CommandSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn layout(&self) -> &LabLayout {
        &self.layout
    }

    pub fn library(&self) -> &SequenceLibrary {
        &self.library
    }

    pub fn library_mut(&mut self) -> &mut SequenceLibrary {
        &mut self.library
    }

    pub fn generator(&self) -> &SequenceGenerator {
        &self.generator
    }

    /// Apply `edit` to the layout and persist it when the edit succeeds
    pub fn edit_layout<R>(
        &mut self,
        edit: impl FnOnce(&mut LabLayout) -> std::result::Result<R, LayoutError>,
    ) -> Result<R> {
        let result = edit(&mut self.layout)?;
        self.autosave()?;
        Ok(result)
    }

    /// Replace the layout with an imported snapshot
    pub fn import_layout(&mut self, snapshot: LayoutSnapshot) -> Result<()> {
        self.edit_layout(|layout| layout.deserialize(snapshot))
    }

    /// Build a new program from `steps`; nothing is kept when a step fails
    pub fn build_sequence(&self, name: &str, steps: &[MoveTarget]) -> Result<SequenceBuffer> {
        let mut buffer = SequenceBuffer::named(name);
        for step in steps {
            self.generator.append_target(&mut buffer, &self.layout, step)?;
        }
        Ok(buffer)
    }

    /// Moonraker channel from the controller settings, or a sink that drops
    /// everything for dry runs
    pub fn command_sink(&self, dry_run: bool) -> Arc<dyn CommandSink> {
        if dry_run {
            return Arc::new(NoOpSink);
        }
        if let Some(sink) = &self.sink {
            return Arc::clone(sink);
        }
        let controller = &self.config.controller;
        Arc::new(
            MoonrakerSink::new(controller.websocket_url())
                .with_close_delay(Duration::from_millis(controller.close_delay_ms)),
        )
    }

    /// Send the stored sequence at `index` to the controller as one script
    pub async fn run_sequence(&self, index: usize, dry_run: bool) -> Result<SequenceBuffer> {
        let mut buffer = SequenceBuffer::new();
        self.library.load_into(index, &mut buffer)?;
        self.command_sink(dry_run).send(&buffer.content()).await?;
        info!("Sent sequence '{}'", buffer.name());
        Ok(buffer)
    }

    fn autosave(&self) -> Result<()> {
        self.layout_store.save(&self.layout.serialize())?;
        debug!("Layout auto-saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use labkit_settings::MemoryStore;

    fn workbench() -> (Workbench, Arc<MemoryStore<LayoutSnapshot>>) {
        let layout_store = Arc::new(MemoryStore::<LayoutSnapshot>::new());
        let bench = Workbench::with_stores(
            Config::default(),
            Box::new(layout_store.clone()),
            Box::new(MemoryStore::<Vec<Sequence>>::new()),
        )
        .unwrap();
        (bench, layout_store)
    }

    #[test]
    fn test_layout_edits_are_autosaved() {
        let (mut bench, store) = workbench();
        bench
            .edit_layout(|layout| Ok(layout.create_object("plate1").id))
            .unwrap();

        let saved = store.snapshot().unwrap();
        assert_eq!(saved.objects.len(), 1);
        assert_eq!(saved.objects[0].name, "plate1");
    }

    #[test]
    fn test_failed_edit_is_not_saved() {
        let (mut bench, store) = workbench();
        let err = bench
            .edit_layout(|layout| layout.update_area(50.0, 50.0))
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn test_restores_saved_layout() {
        let mut layout = LabLayout::new();
        layout.create_object("reservoir");
        let store = MemoryStore::with_value(layout.serialize());

        let bench = Workbench::with_stores(
            Config::default(),
            Box::new(store),
            Box::new(MemoryStore::<Vec<Sequence>>::new()),
        )
        .unwrap();
        assert!(bench.layout().get_object_by_name("reservoir").is_some());
    }

    #[tokio::test]
    async fn test_run_sequence_uses_injected_sink() {
        let sink = Arc::new(crate::RecordingSink::new());
        let (bench, _) = workbench();
        let mut bench = bench.with_command_sink(sink.clone());
        bench.library_mut().save("prime", "G90\nG4 P500", |_| true).unwrap();

        bench.run_sequence(0, true).await.unwrap();
        assert!(sink.commands().is_empty());

        let sent = bench.run_sequence(0, false).await.unwrap();
        assert_eq!(sent.name(), "prime");
        assert_eq!(sink.commands(), ["G90\nG4 P500"]);

        let err = bench.run_sequence(3, false).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(sink.commands().len(), 1);
    }

    #[test]
    fn test_config_shapes_new_layout() {
        let mut config = Config::default();
        config.layout.bed_width = 250.0;
        config.layout.clone_offset_x = 5.0;
        config.motion.feed_xy = 1200.0;

        let mut bench = Workbench::with_stores(
            config,
            Box::new(MemoryStore::<LayoutSnapshot>::new()),
            Box::new(MemoryStore::<Vec<Sequence>>::new()),
        )
        .unwrap();
        assert_eq!(bench.layout().bed().width, 250.0);

        let copy_x = bench
            .edit_layout(|layout| {
                layout.create_object("a");
                layout.clone_object(0).map(|obj| obj.position.x)
            })
            .unwrap();
        assert_eq!(copy_x, 105.0);

        let steps = vec!["a".parse().unwrap()];
        let buffer = bench.build_sequence("s", &steps).unwrap();
        assert!(buffer.content().contains("F1200  ; Move to object position"));
    }
}
