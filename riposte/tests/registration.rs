//! Startup registration and command sync.

use riposte::{
    Action, ActionInitializer, ActionManager, Button, Command, CommandOption, ContextAction,
    DispatchConfig, OptionKind, RegistryError, testing::RecordingRegistrar,
};
use std::time::Duration;

mod common;
use common::{Key, Recorder};

struct MusicActions {
    recorder: Recorder,
}

impl ActionInitializer for MusicActions {
    fn create_actions(&self, manager: &ActionManager) -> Result<(), RegistryError> {
        manager.add_action(
            Action::builder("play")
                .command(
                    Command::new("play", "Play a song")
                        .option(
                            CommandOption::new(OptionKind::String, "query", "What to play")
                                .required(),
                        )
                        .option(CommandOption::new(OptionKind::Boolean, "loop", "Repeat it"))
                        .nicknames(["p", "add"])
                        .guild_only()
                        .option_arg("query", Key::Query)
                        .option_arg("loop", Key::Loop),
                )
                .build(self.recorder.handler()),
        );
        manager.add_action(
            Action::builder("skip")
                .command(Command::new("skip", "Skip the current song"))
                .button(Button::new("skip", "Skip"))
                .build(self.recorder.handler()),
        );
        Ok(())
    }
}

#[tokio::test]
async fn sync_registers_every_command_variant() {
    let manager = ActionManager::from_initializer(
        DispatchConfig::default(),
        &MusicActions {
            recorder: Recorder::new(),
        },
    )
    .unwrap();
    let registrar = RecordingRegistrar::new();

    manager.sync_commands(&registrar).await.unwrap();

    assert_eq!(registrar.last_names(), ["play", "add", "p", "skip"]);
    let batch = &registrar.batches()[0];
    let shortcut = batch.iter().find(|data| data.name == "add").unwrap();
    assert_eq!(shortcut.description, "Shortcut for /play");
    assert_eq!(shortcut.options, batch[0].options);
    assert!(shortcut.guild_only);
}

#[tokio::test]
async fn context_actions_contribute_no_commands() {
    let manager = ActionManager::new();
    manager.add_action(
        Action::builder("ping")
            .command(Command::new("ping", "Ping"))
            .build(Recorder::new().handler()),
    );
    ContextAction::builder("confirm", Duration::from_secs(60))
        .button(Button::contextual(manager.ids(), "Confirm"))
        .register(&manager, Recorder::new().handler())
        .unwrap();

    let names: Vec<_> = manager.command_data().into_iter().map(|data| data.name).collect();
    assert_eq!(names, ["ping"]);
    assert_eq!(manager.len(), 2);
}

#[test]
fn initializer_errors_abort_startup() {
    let initializer = |manager: &ActionManager| -> Result<(), RegistryError> {
        ContextAction::builder("too-early", Duration::from_secs(1))
            .button(Button::contextual(manager.ids(), "Early"))
            .register(manager, Recorder::new().handler())?;
        Ok(())
    };
    let result = ActionManager::from_initializer(DispatchConfig::default(), &initializer);
    assert!(matches!(result, Err(RegistryError::NoRuntime { .. })));
}
