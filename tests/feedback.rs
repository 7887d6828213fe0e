extern crate env_logger;
extern crate gltrack;

use std::rc::Rc;

use gltrack::prelude::*;

fn setup(settings: Settings) -> (Rc<Context>, Journal) {
    let _ = env_logger::try_init();
    let driver = HeadlessDriver::new();
    let journal = driver.journal();
    (Context::new(Box::new(driver), settings), journal)
}

#[test]
fn session() {
    let (ctx, journal) = setup(Settings::validated());

    let feedback = TransformFeedback::new(&ctx).unwrap();
    assert_eq!(feedback.state(), SessionState::Idle);

    feedback.bind().unwrap();
    feedback.begin(FeedbackPrimitive::Triangles).unwrap();
    assert_eq!(
        feedback.state(),
        SessionState::Active(FeedbackPrimitive::Triangles)
    );

    feedback.pause().unwrap();
    assert_eq!(
        feedback.state(),
        SessionState::Paused(FeedbackPrimitive::Triangles)
    );

    feedback.resume().unwrap();
    assert_eq!(
        feedback.state(),
        SessionState::Active(FeedbackPrimitive::Triangles)
    );

    feedback.end().unwrap();
    assert_eq!(feedback.state(), SessionState::Idle);

    let calls: Vec<_> = journal
        .calls()
        .into_iter()
        .filter(|v| match v {
            Call::BeginFeedback(_)
            | Call::PauseFeedback
            | Call::ResumeFeedback
            | Call::EndFeedback => true,
            _ => false,
        })
        .collect();

    assert_eq!(
        calls,
        vec![
            Call::BeginFeedback(FeedbackPrimitive::Triangles),
            Call::PauseFeedback,
            Call::ResumeFeedback,
            Call::EndFeedback,
        ]
    );
}

#[test]
fn invalid_transitions() {
    let (ctx, journal) = setup(Settings::validated());

    let feedback = TransformFeedback::new(&ctx).unwrap();
    feedback.bind().unwrap();

    for v in &[feedback.pause(), feedback.resume(), feedback.end()] {
        match v {
            Err(Error::State { state, .. }) => assert_eq!(*state, SessionState::Idle),
            v => panic!("{:?}", v),
        }
    }

    feedback.begin(FeedbackPrimitive::Points).unwrap();
    match feedback.begin(FeedbackPrimitive::Lines) {
        Err(Error::State {
            operation, state, ..
        }) => {
            assert_eq!(operation, "begin");
            assert_eq!(state, SessionState::Active(FeedbackPrimitive::Points));
        }
        v => panic!("{:?}", v),
    }

    assert!(feedback.resume().is_err());

    feedback.pause().unwrap();
    assert!(feedback.pause().is_err());
    assert!(feedback.begin(FeedbackPrimitive::Points).is_err());

    // Ending is valid from a paused session too.
    feedback.end().unwrap();
    assert_eq!(feedback.state(), SessionState::Idle);

    // Refused transitions never reach the driver.
    assert_eq!(
        journal.count(|v| match v {
            Call::BeginFeedback(_) => true,
            _ => false,
        }),
        1
    );
}

#[test]
fn transitions_require_binding() {
    let (ctx, _) = setup(Settings::validated());

    let a = TransformFeedback::new(&ctx).unwrap();
    let b = TransformFeedback::new(&ctx).unwrap();
    b.bind().unwrap();

    match a.begin(FeedbackPrimitive::Points) {
        Err(Error::Binding { target, .. }) => assert_eq!(target, Target::TransformFeedback),
        v => panic!("{:?}", v),
    }

    assert_eq!(a.state(), SessionState::Idle);
}

#[test]
fn begin_new() {
    let (ctx, _) = setup(Settings::validated());

    let feedback = TransformFeedback::begin_new(&ctx, FeedbackPrimitive::Lines).unwrap();
    assert!(feedback.is_current().unwrap());
    assert_eq!(
        feedback.state(),
        SessionState::Active(FeedbackPrimitive::Lines)
    );

    feedback.end().unwrap();
}

#[test]
fn drop_ends_the_session() {
    let (ctx, journal) = setup(Settings::validated());

    let feedback = TransformFeedback::begin_new(&ctx, FeedbackPrimitive::Points).unwrap();
    let id = feedback.id();
    let clone = feedback.clone();

    drop(feedback);
    assert_eq!(journal.count(|v| *v == Call::EndFeedback), 0);

    drop(clone);
    let end = journal.position(|v| *v == Call::EndFeedback).unwrap();
    let delete = journal
        .position(|v| *v == Call::Delete(ObjectKind::TransformFeedback, id))
        .unwrap();

    assert!(end < delete);
    assert_eq!(journal.count(|v| *v == Call::EndFeedback), 1);
    assert_eq!(
        journal.count(|v| *v == Call::Delete(ObjectKind::TransformFeedback, id)),
        1
    );
}

#[test]
fn drop_ends_paused_sessions() {
    let (ctx, journal) = setup(Settings::validated());

    let other = TransformFeedback::new(&ctx).unwrap();
    let feedback = TransformFeedback::begin_new(&ctx, FeedbackPrimitive::Points).unwrap();
    feedback.pause().unwrap();

    // Switching objects is allowed while paused.
    other.bind().unwrap();
    drop(feedback);

    assert_eq!(journal.count(|v| *v == Call::EndFeedback), 1);
    assert!(!other.is_current().unwrap());
}

#[test]
fn idle_drop_does_not_end() {
    let (ctx, journal) = setup(Settings::validated());

    let feedback = TransformFeedback::begin_new(&ctx, FeedbackPrimitive::Points).unwrap();
    feedback.end().unwrap();
    drop(feedback);

    assert_eq!(journal.count(|v| *v == Call::EndFeedback), 1);
}

#[test]
fn pause_needs_capability() {
    let _ = env_logger::try_init();
    let caps = Capabilities::full().without(Capability::TransformFeedbackPause);
    let ctx = Context::new(
        Box::new(HeadlessDriver::with_capabilities(caps)),
        Settings::validated(),
    );

    let feedback = TransformFeedback::begin_new(&ctx, FeedbackPrimitive::Points).unwrap();
    match feedback.pause() {
        Err(Error::Unsupported(Capability::TransformFeedbackPause)) => {}
        v => panic!("{:?}", v),
    }

    assert_eq!(
        feedback.state(),
        SessionState::Active(FeedbackPrimitive::Points)
    );
    feedback.end().unwrap();
}
