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

/// Binds `b` over `a` and uploads through `a`.
fn upload_through_stale_binding(settings: Settings) -> (Journal, Result<()>, u32, u32) {
    let (ctx, journal) = setup(settings);

    let a = CopyReadBuffer::new(&ctx).unwrap();
    let b = CopyReadBuffer::new(&ctx).unwrap();
    a.bind().unwrap();
    b.bind().unwrap();
    journal.clear();

    let result = a.data(&[1, 2, 3, 4], BufferUsage::StaticDraw);
    (journal, result, a.id(), b.id())
}

#[test]
fn enabled_validation_refuses() {
    let (journal, result, a, _) = upload_through_stale_binding(Settings::validated());

    match result {
        Err(Error::Binding {
            resource,
            operation,
            target,
        }) => {
            assert_eq!(resource, format!("Buffer #{}", a));
            assert_eq!(operation, "data");
            assert_eq!(target, Target::CopyReadBuffer);
        }
        v => panic!("{:?}", v),
    }

    assert_eq!(journal.count(|v| *v == Call::BufferData(Target::CopyReadBuffer, 4)), 0);
}

#[test]
fn disabled_validation_trusts_the_caller() {
    let (journal, result, _, _) = upload_through_stale_binding(Settings::unchecked());

    // The upload goes to whatever is bound, exactly as the raw call would.
    result.unwrap();
    assert_eq!(journal.calls(), vec![Call::BufferData(Target::CopyReadBuffer, 4)]);
}

#[test]
fn messages_name_everything() {
    let (_, result, a, _) = upload_through_stale_binding(Settings::validated());
    let message = result.unwrap_err().to_string();

    assert!(message.contains("data"));
    assert!(message.contains(&format!("Buffer #{}", a)));
    assert!(message.contains("GL_COPY_READ_BUFFER"));
}

#[test]
fn disabled_validation_still_asks_the_driver() {
    let (ctx, journal) = setup(Settings::unchecked());

    let buf = ArrayBuffer::new(&ctx).unwrap();
    buf.bind().unwrap();
    journal.clear();

    assert!(buf.is_current().unwrap());
    assert_eq!(journal.calls(), vec![Call::Binding(Target::ArrayBuffer)]);

    // A foreign bind is noticed.
    unsafe { ctx.driver().bind(Target::ArrayBuffer, 0).unwrap() };
    assert!(!buf.is_current().unwrap());
}

#[test]
fn driver_errors_surface_unchanged() {
    let (ctx, _) = setup(Settings::unchecked());

    // Nothing bound, the driver refuses.
    let buf = ArrayBuffer::new(&ctx).unwrap();
    match buf.data(&[0; 4], BufferUsage::StaticDraw) {
        Err(Error::Driver(message)) => assert!(message.contains("GL_INVALID_OPERATION")),
        v => panic!("{:?}", v),
    }

    // Out of range writes are left to the driver as well.
    buf.bind().unwrap();
    buf.reserve(2, BufferUsage::StaticDraw).unwrap();
    match buf.sub_data(1, &[0; 4]) {
        Err(Error::Driver(_)) => {}
        v => panic!("{:?}", v),
    }
}

#[test]
fn unchecked_dependencies() {
    let _ = env_logger::try_init();
    let caps = Capabilities::new(Version::GL(2, 1));
    let ctx = Context::new(
        Box::new(HeadlessDriver::with_capabilities(caps)),
        Settings::unchecked(),
    );

    // Missing capabilities are not checked, the call is forwarded.
    assert!(UniformBuffer::new(&ctx).is_ok());
    assert!(TransformFeedback::new(&ctx).is_ok());
}
