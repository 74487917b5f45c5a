//! Deferred store work.
//!
//! Listing and loading characters run off the input loop. Each task carries
//! the screen activation that asked for it; the app drops results whose
//! activation is no longer current.

use charsheet_core::{Character, CharacterId, CharacterStore, CharacterSummary, PersistError};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

use crate::events::AppEvent;
use crate::screens::ScreenKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredTask {
    ListCharacters,
    LoadCharacter(CharacterId),
}

/// Which screen activation a task belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskTag {
    pub screen: ScreenKind,
    pub generation: u64,
}

#[derive(Debug)]
pub enum TaskOutcome {
    Characters(Result<Vec<CharacterSummary>, PersistError>),
    Loaded(Result<Character, PersistError>),
}

#[derive(Debug)]
pub struct TaskResult {
    pub tag: TaskTag,
    pub outcome: TaskOutcome,
}

/// Run a task on the calling thread.
pub fn run(task: DeferredTask, store: &dyn CharacterStore) -> TaskOutcome {
    match task {
        DeferredTask::ListCharacters => TaskOutcome::Characters(store.list()),
        DeferredTask::LoadCharacter(id) => TaskOutcome::Loaded(store.load(id)),
    }
}

/// Run a task on the blocking pool and post the result back to the loop.
pub fn spawn(
    task: DeferredTask,
    tag: TaskTag,
    store: Arc<dyn CharacterStore>,
    tx: UnboundedSender<AppEvent>,
) {
    tracing::debug!(?task, screen = ?tag.screen, generation = tag.generation, "Spawning task");
    tokio::task::spawn_blocking(move || {
        let outcome = run(task, store.as_ref());
        if tx.send(AppEvent::Task(TaskResult { tag, outcome })).is_err() {
            tracing::debug!(?task, "Loop gone before task finished");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use charsheet_core::testing::{sample_fighter, sample_wizard};
    use charsheet_core::MemoryStore;

    #[test]
    fn test_run_list_and_load() {
        let fighter = sample_fighter("Bruni");
        let store = MemoryStore::with([fighter.clone(), sample_wizard("Elara")]);

        let TaskOutcome::Characters(Ok(list)) = run(DeferredTask::ListCharacters, &store) else {
            panic!("expected a character list");
        };
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].name, "Bruni");

        let TaskOutcome::Loaded(Ok(loaded)) = run(DeferredTask::LoadCharacter(fighter.id), &store)
        else {
            panic!("expected a loaded character");
        };
        assert_eq!(loaded, fighter);
    }

    #[test]
    fn test_run_reports_store_errors() {
        let store = MemoryStore::new();
        store.fail_reads(true);
        assert!(matches!(
            run(DeferredTask::ListCharacters, &store),
            TaskOutcome::Characters(Err(_))
        ));
    }

    #[tokio::test]
    async fn test_spawn_posts_result() {
        let store: Arc<dyn CharacterStore> = Arc::new(MemoryStore::with([sample_fighter("Bruni")]));
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let tag = TaskTag {
            screen: ScreenKind::Selection,
            generation: 7,
        };

        spawn(DeferredTask::ListCharacters, tag, store, tx);
        let Some(AppEvent::Task(result)) = rx.recv().await else {
            panic!("expected a task result");
        };
        assert_eq!(result.tag, tag);
        assert!(matches!(result.outcome, TaskOutcome::Characters(Ok(ref list)) if list.len() == 1));
    }
}
