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

fn round_trip(len: usize) {
    let (ctx, _) = setup(Settings::validated());
    let bytes: Vec<u8> = (0..len).map(|i| (i * 7 % 251) as u8).collect();

    let mut buf = ArrayBuffer::new(&ctx).unwrap();
    buf.bind().unwrap();
    buf.data(&bytes, BufferUsage::StaticDraw).unwrap();
    assert_eq!(buf.size().unwrap(), len);

    let map = buf.map(MapAccess::ReadOnly).unwrap();
    assert_eq!(map.size(), len);
    assert_eq!(&map[..], &bytes[..]);
}

#[test]
fn round_trip_empty() {
    round_trip(0);
}

#[test]
fn round_trip_one_byte() {
    round_trip(1);
}

#[test]
fn round_trip_page() {
    round_trip(4096);
}

#[test]
fn sub_data() {
    let (ctx, _) = setup(Settings::validated());

    let mut buf = CopyWriteBuffer::new(&ctx).unwrap();
    buf.bind().unwrap();
    buf.reserve(8, BufferUsage::DynamicDraw).unwrap();
    buf.sub_data(0, &[0; 8]).unwrap();
    buf.sub_data(2, &[1, 2, 3]).unwrap();
    buf.sub_data(8, &[]).unwrap();

    match buf.sub_data(6, &[1, 2, 3]) {
        Err(Error::OutOfBounds) => {}
        v => panic!("{:?}", v),
    }

    let map = buf.map(MapAccess::ReadWrite).unwrap();
    assert_eq!(&map[..], &[0, 0, 1, 2, 3, 0, 0, 0]);
}

#[test]
fn typed_data() {
    let (ctx, _) = setup(Settings::validated());

    let mut buf = ArrayBuffer::new(&ctx).unwrap();
    buf.bind().unwrap();
    buf.data_typed(&[1.0f32, 2.0, 3.0, 4.0], BufferUsage::StaticDraw)
        .unwrap();
    assert_eq!(buf.size().unwrap(), 16);

    buf.sub_data_typed(4, &[8.0f32]).unwrap();

    {
        let map = buf.map(MapAccess::ReadOnly).unwrap();
        assert_eq!(map.typed::<f32>().unwrap(), &[1.0, 8.0, 3.0, 4.0]);
        match map.typed::<[f32; 3]>() {
            Err(Error::Layout(_)) => {}
            v => panic!("{:?}", v),
        }
    }

    let mut map = buf.map(MapAccess::WriteOnly).unwrap();
    map.typed_mut::<u32>().unwrap()[3] = 0;
    assert!(map.unmap().unwrap());
}

#[test]
fn map_range() {
    let (ctx, journal) = setup(Settings::validated());

    let mut buf = PixelUnpackBuffer::new(&ctx).unwrap();
    buf.bind().unwrap();
    buf.data(&[0; 16], BufferUsage::StreamDraw).unwrap();

    {
        let mut map = buf
            .map_range(4, 4, MapAccessFlags::WRITE | MapAccessFlags::INVALIDATE_RANGE)
            .unwrap();
        assert_eq!(map.size(), 4);
        map.as_mut_slice().unwrap().copy_from_slice(&[9, 9, 9, 9]);
    }

    assert_eq!(journal.count(|v| *v == Call::MapRange(Target::PixelUnpackBuffer, 4, 4)), 1);
    assert_eq!(journal.count(|v| *v == Call::Unmap(Target::PixelUnpackBuffer)), 1);

    match buf.map_range(12, 8, MapAccessFlags::READ) {
        Err(Error::OutOfBounds) => {}
        v => panic!("{:?}", v),
    }

    // Neither read nor write access is a driver error, and leaves nothing mapped.
    assert!(buf.map_range(0, 4, MapAccessFlags::INVALIDATE_BUFFER).is_err());
    assert!(!ctx.is_mapped(buf.id()));

    let map = buf.map(MapAccess::ReadOnly).unwrap();
    assert_eq!(&map[4..8], &[9, 9, 9, 9]);
    assert_eq!(&map[..4], &[0, 0, 0, 0]);
}

fn fill(buf: &mut ArrayBuffer, fail: bool) -> Result<()> {
    let mut map = buf.map(MapAccess::WriteOnly)?;
    map.as_mut_slice()?[0] = 7;

    if fail {
        return Err(Error::OutOfBounds);
    }

    map.as_mut_slice()?[1] = 7;
    Ok(())
}

#[test]
fn unmap_on_every_path() {
    let (ctx, journal) = setup(Settings::validated());

    let mut buf = ArrayBuffer::new(&ctx).unwrap();
    buf.bind().unwrap();
    buf.data(&[0; 4], BufferUsage::DynamicDraw).unwrap();

    assert!(fill(&mut buf, true).is_err());
    assert!(!ctx.is_mapped(buf.id()));
    assert_eq!(journal.count(|v| *v == Call::Unmap(Target::ArrayBuffer)), 1);

    fill(&mut buf, false).unwrap();
    assert!(!ctx.is_mapped(buf.id()));
    assert_eq!(journal.count(|v| *v == Call::Unmap(Target::ArrayBuffer)), 2);

    let map = buf.map(MapAccess::ReadOnly).unwrap();
    assert_eq!(&map[..], &[7, 7, 0, 0]);
}

#[test]
fn one_mapping_per_buffer() {
    let (ctx, _) = setup(Settings::validated());

    let mut a = ArrayBuffer::new(&ctx).unwrap();
    let mut b = a.clone();
    a.bind().unwrap();
    a.data(&[1, 2], BufferUsage::StaticDraw).unwrap();

    let map = a.map(MapAccess::ReadOnly).unwrap();
    let b_id = b.id();
    match b.map(MapAccess::ReadOnly) {
        Err(Error::AlreadyMapped(id)) => assert_eq!(id, b_id),
        v => panic!("{:?}", v),
    }

    match b.data(&[3], BufferUsage::StaticDraw) {
        Err(Error::AlreadyMapped(_)) => {}
        v => panic!("{:?}", v),
    }

    drop(map);
    assert!(b.map(MapAccess::ReadOnly).is_ok());
}

#[test]
fn unmap_rebinds() {
    let (ctx, journal) = setup(Settings::validated());

    let mut a = ArrayBuffer::new(&ctx).unwrap();
    let other = ArrayBuffer::new(&ctx).unwrap();
    a.bind().unwrap();
    a.data(&[1, 2, 3], BufferUsage::StaticDraw).unwrap();

    let id = a.id();
    let map = a.map(MapAccess::ReadOnly).unwrap();
    other.bind().unwrap();
    drop(map);

    let calls = journal.calls();
    let unmap = calls
        .iter()
        .rposition(|v| *v == Call::Unmap(Target::ArrayBuffer))
        .unwrap();
    assert_eq!(calls[unmap - 1], Call::Bind(Target::ArrayBuffer, id));
    assert!(!ctx.is_mapped(id));
}

#[test]
fn unchecked_unmap_rebinds() {
    let (ctx, journal) = setup(Settings::unchecked());

    let mut a = ArrayBuffer::new(&ctx).unwrap();
    let b = ArrayBuffer::new(&ctx).unwrap();
    a.bind().unwrap();
    a.data(&[1, 2, 3], BufferUsage::StaticDraw).unwrap();

    let map = a.map(MapAccess::ReadOnly).unwrap();
    unsafe { ctx.driver().bind(Target::ArrayBuffer, b.id()).unwrap() };
    drop(map);

    let calls = journal.calls();
    let unmap = calls
        .iter()
        .rposition(|v| *v == Call::Unmap(Target::ArrayBuffer))
        .unwrap();
    assert_eq!(calls[unmap - 1], Call::Bind(Target::ArrayBuffer, a.id()));

    // The driver released the mapping of `a`, so it maps again.
    let map = a.map(MapAccess::ReadOnly).unwrap();
    assert_eq!(&map[..], &[1, 2, 3]);
}

#[test]
fn array_uploads_look_for_a_vertex_array() {
    let (ctx, journal) = setup(Settings::validated());

    let vao = Handle::create(&ctx, ObjectKind::VertexArray).unwrap();
    ctx.bind(Target::VertexArray, vao.id()).unwrap();

    let buf = ArrayBuffer::new(&ctx).unwrap();
    buf.bind().unwrap();
    journal.clear();

    buf.data(&[0; 4], BufferUsage::StaticDraw).unwrap();
    assert_eq!(journal.count(|v| *v == Call::Binding(Target::VertexArray)), 1);

    // Without a vertex array the upload still goes through.
    ctx.unbind(Target::VertexArray).unwrap();
    buf.data(&[0; 4], BufferUsage::StaticDraw).unwrap();
    assert_eq!(journal.count(|v| *v == Call::Binding(Target::VertexArray)), 2);
    assert_eq!(journal.count(|v| *v == Call::BufferData(Target::ArrayBuffer, 4)), 2);

    // Other targets do not care.
    let index = IndexBuffer::new(&ctx).unwrap();
    index.bind().unwrap();
    index.data(&[0; 4], BufferUsage::StaticDraw).unwrap();
    assert_eq!(journal.count(|v| *v == Call::Binding(Target::VertexArray)), 2);
}

#[test]
fn compatibility_profiles_skip_the_vertex_array_check() {
    let _ = env_logger::try_init();
    let mut caps = Capabilities::full();
    caps.profile = Some(Profile::Compatibility);

    let driver = HeadlessDriver::with_capabilities(caps);
    let journal = driver.journal();
    let ctx = Context::new(Box::new(driver), Settings::validated());

    let buf = ArrayBuffer::new(&ctx).unwrap();
    buf.bind().unwrap();
    buf.data(&[0; 4], BufferUsage::StaticDraw).unwrap();

    assert_eq!(journal.count(|v| *v == Call::Binding(Target::VertexArray)), 0);
}

#[test]
fn missing_capabilities() {
    let _ = env_logger::try_init();
    let caps = Capabilities::full()
        .without(Capability::UniformBuffer)
        .without(Capability::MapBufferRange);
    let driver = HeadlessDriver::with_capabilities(caps);
    let ctx = Context::new(Box::new(driver), Settings::validated());

    match UniformBuffer::new(&ctx) {
        Err(Error::Unsupported(Capability::UniformBuffer)) => {}
        v => panic!("{:?}", v),
    }

    let mut buf = ArrayBuffer::new(&ctx).unwrap();
    buf.bind().unwrap();
    buf.data(&[0; 4], BufferUsage::StaticDraw).unwrap();
    match buf.map_range(0, 4, MapAccessFlags::READ) {
        Err(Error::Unsupported(Capability::MapBufferRange)) => {}
        v => panic!("{:?}", v),
    };
}
