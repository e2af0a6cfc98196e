//! Routing interactions to actions through the manager.

use riposte::{
    Action, ActionManager, ArgValue, Button, Command, CommandOption, DispatchConfig,
    DispatchOutcome, Interaction, Modal, OptionKind, Require, Selection,
    testing::{CountingCheck, MockInteraction, SentVia},
};

mod common;
use common::{Key, Recorder, failing_handler};

const NOT_FOUND: &str = "Oops, the bot doesn't know how to respond to whatever you just did. \
                         Please contact the bot owner";

#[tokio::test]
async fn commands_match_names_and_nicknames_case_insensitively() {
    let manager = ActionManager::new();
    let recorder = Recorder::new();
    manager.add_action(
        Action::builder("play")
            .command(
                Command::new("play", "Play a song")
                    .option(
                        CommandOption::new(OptionKind::String, "query", "What to play").required(),
                    )
                    .nicknames(["P"])
                    .option_arg("query", Key::Query),
            )
            .build(recorder.handler()),
    );

    for name in ["play", "PLAY", "p", "P"] {
        let (interaction, _) = MockInteraction::command(name).option("query", "lofi").build();
        assert_eq!(manager.run(&interaction).await, DispatchOutcome::Done);
    }

    assert_eq!(recorder.count(), 4);
    assert!(
        recorder
            .calls()
            .iter()
            .all(|(_, args)| args.get(&Key::Query).as_str() == Some("lofi"))
    );
}

#[tokio::test]
async fn kinds_are_isolated() {
    let manager = ActionManager::new();
    let recorder = Recorder::new();
    manager.add_action(
        Action::builder("queue")
            .button(Button::new("queue", "Queue"))
            .build(recorder.handler()),
    );

    let (command, responder) = MockInteraction::command("queue").build();
    assert_eq!(manager.run(&command).await, DispatchOutcome::NotFound { expired: false });
    assert_eq!(responder.contents(), [NOT_FOUND]);

    let (modal, _) = MockInteraction::modal("queue").build();
    assert!(matches!(manager.run(&modal).await, DispatchOutcome::NotFound { .. }));

    let (button, _) = MockInteraction::button("QUEUE").build();
    assert!(manager.run(&button).await.is_done());
    assert_eq!(recorder.tokens(), ["QUEUE"]);
}

#[tokio::test]
async fn each_kind_produces_its_own_arguments() {
    let manager = ActionManager::new();
    let recorder = Recorder::new();
    manager.add_action(
        Action::builder("moderation")
            .button(Button::new("warn", "Warn").arg(Key::Choice, "warn"))
            .modal(Modal::new("ban", "Ban").field_arg("reason", Key::Reason))
            .selection(
                Selection::new("pick", Key::Next).root_value(|_| Some(ArgValue::from("root"))),
            )
            .build(recorder.handler()),
    );

    let (button, _) = MockInteraction::button("warn").build();
    let (modal, _) = MockInteraction::modal("ban").field("reason", "spam").build();
    let (pick, _) = MockInteraction::selection("pick", ["first", "second"]).build();
    for interaction in [&button, &modal, &pick] {
        assert!(manager.run(interaction).await.is_done());
    }

    let calls = recorder.calls();
    assert_eq!(calls[0].1.get(&Key::Choice).as_str(), Some("warn"));
    assert_eq!(calls[1].1.get(&Key::Reason).as_str(), Some("spam"));
    let selection = &calls[2].1;
    assert_eq!(selection.value().and_then(ArgValue::as_str), Some("root"));
    let chain: Vec<_> = selection.chain(&Key::Next).filter_map(ArgValue::as_str).collect();
    assert_eq!(chain, ["first", "second"]);
}

#[tokio::test]
async fn rejected_dispatch_never_reaches_the_handler() {
    let manager = ActionManager::new();
    let recorder = Recorder::new();
    let later = CountingCheck::pass();
    manager.add_action(
        Action::builder("ban")
            .command(Command::new("ban", "Ban someone"))
            .check(Require::new("Admins only", |_| false))
            .check(later.clone())
            .build(recorder.handler()),
    );

    let (interaction, responder) = MockInteraction::command("ban").build();
    let outcome = manager.run(&interaction).await;

    assert_eq!(outcome, DispatchOutcome::Rejected { message: "Admins only".into() });
    assert_eq!(later.calls(), 0);
    assert_eq!(recorder.count(), 0);
    let sent = responder.last().unwrap();
    assert_eq!(sent.via, SentVia::Reply);
    assert!(sent.reply.ephemeral);
}

#[tokio::test]
async fn rejection_after_acknowledgement_uses_follow_up() {
    let manager = ActionManager::new();
    manager.add_action(
        Action::builder("slow")
            .button(Button::new("slow", "Slow"))
            .check(CountingCheck::reject("Not now"))
            .build(Recorder::new().handler()),
    );

    let (interaction, responder) = MockInteraction::button("slow").acknowledged().build();
    manager.run(&interaction).await;

    let sent = responder.last().unwrap();
    assert_eq!(sent.via, SentVia::FollowUp);
    assert_eq!(sent.reply.content, "Not now");
}

#[tokio::test]
async fn handler_faults_are_contained() {
    let config = DispatchConfig::new().with_internal_error_template("Something broke: {error}");
    let manager = ActionManager::with_config(config);
    manager.add_action(
        Action::builder("stats")
            .command(Command::new("stats", "Show stats"))
            .build(failing_handler("database unreachable")),
    );
    let recorder = Recorder::new();
    manager.add_action(
        Action::builder("ping")
            .command(Command::new("ping", "Ping"))
            .build(recorder.handler()),
    );

    let (stats, responder) = MockInteraction::command("stats").build();
    assert_eq!(
        manager.run(&stats).await,
        DispatchOutcome::Failed { message: "Something broke: database unreachable".into() }
    );
    assert_eq!(responder.contents(), ["Something broke: database unreachable"]);

    let (ping, _) = MockInteraction::command("ping").build();
    assert!(manager.run(&ping).await.is_done());
    assert_eq!(recorder.count(), 1);
}

#[tokio::test]
async fn panicking_guard_is_answered_with_internal_error() {
    let manager = ActionManager::new();
    let recorder = Recorder::new();
    manager.add_action(
        Action::builder("volatile")
            .button(Button::new("volatile", "Volatile"))
            .check(Require::new("unused", |_: &Interaction| -> bool {
                panic!("guard exploded")
            }))
            .build(recorder.handler()),
    );

    let (interaction, responder) = MockInteraction::button("volatile").build();
    let task = {
        let manager = manager.clone();
        tokio::spawn(async move { manager.run(&interaction).await })
    };

    let outcome = task.await.unwrap();
    let expected = "The bot ran into an internal error, please report this issue \
                    to the bot owner (guard exploded)";
    assert_eq!(outcome, DispatchOutcome::Failed { message: expected.into() });
    assert_eq!(responder.contents(), [expected]);
    assert_eq!(recorder.count(), 0);
}

#[tokio::test]
async fn reply_failures_do_not_escape() {
    let manager = ActionManager::new();
    let (interaction, responder) = MockInteraction::button("ghost").failing_replies().build();
    assert_eq!(manager.run(&interaction).await, DispatchOutcome::NotFound { expired: false });
    assert!(responder.sent().is_empty());
}

#[tokio::test]
async fn inputs_attached_after_registration_are_routed() {
    let manager = ActionManager::new();
    let recorder = Recorder::new();
    let handle = manager.add_action(Action::builder("poll").build(recorder.handler()));

    let (early, _) = MockInteraction::button("poll-1").build();
    assert!(matches!(manager.run(&early).await, DispatchOutcome::NotFound { .. }));

    handle.action().add_button(Button::new("poll-1", "Vote"));
    let (late, _) = MockInteraction::button("poll-1").build();
    assert!(manager.run(&late).await.is_done());
    assert_eq!(recorder.count(), 1);
}
