//! End-to-end decoding tests driven by encoded streams.

use proptest::prelude::*;
use tlm_common::{TypedValue, Unit, ValueType};
use tlm_math::PerformanceCalculator;
use tlm_telemetry::test_utils::StreamBuilder;
use tlm_telemetry::{
    parse_telemetry, DecimatingProcessor, EventKind, ParserOptions, PerformanceData,
    TelemetryError, TimeDomain, MAX_EVENT_DEPTH, TIMING_PROVIDER,
};

fn decode(builder: &StreamBuilder) -> Result<tlm_telemetry::Container, TelemetryError> {
    parse_telemetry(&builder.finish(), &ParserOptions::default())
}

// ============================================================================
// Header
// ============================================================================

#[test]
fn rejects_old_version() {
    let data = StreamBuilder::with_header(1, 8).finish();
    assert!(matches!(
        parse_telemetry(&data, &ParserOptions::default()),
        Err(TelemetryError::UnsupportedFormat {
            version: 1,
            header_length: 8
        })
    ));
}

#[test]
fn rejects_wrong_header_length() {
    let data = StreamBuilder::with_header(2, 12).finish();
    assert!(matches!(
        parse_telemetry(&data, &ParserOptions::default()),
        Err(TelemetryError::UnsupportedFormat {
            version: 2,
            header_length: 12
        })
    ));
}

// ============================================================================
// Providers and packets
// ============================================================================

#[test]
fn frame_time_example() {
    let mut builder = StreamBuilder::new();
    builder
        .register_provider(7, "com.example.timer", "Timer", 1, &[(0, ValueType::F64, Unit::Time, "frame")])
        .packet(7, 1.0, &[(0, TypedValue::F64(0.016))])
        .packet(7, 2.0, &[(0, TypedValue::F64(0.020))]);

    let container = decode(&builder).unwrap();
    let field = container.provider(7).unwrap().field(0).unwrap();
    assert_eq!(field.unit, Unit::Time);
    assert_eq!(field.sample_count(), 2);

    let calc = PerformanceCalculator::new(field.samples(), 0.0, 2.0);
    assert!((calc.average() - 0.018).abs() < 1e-12);
    assert_eq!(calc.percentile(0.5), 0.020);

    assert_eq!((container.start_time, container.end_time), (1.0, 2.0));
}

#[test]
fn packet_for_undeclared_field() {
    let mut builder = StreamBuilder::new();
    builder
        .register_provider(1, "p", "P", 1, &[(0, ValueType::U8, Unit::Value, "a")])
        .packet(1, 0.0, &[(3, TypedValue::U8(1))]);

    assert!(matches!(
        decode(&builder),
        Err(TelemetryError::UnknownField {
            provider: 1,
            field: 3
        })
    ));
}

#[test]
fn packet_for_unknown_provider() {
    let mut builder = StreamBuilder::new();
    builder.packet(9, 0.0, &[]);
    assert!(matches!(
        decode(&builder),
        Err(TelemetryError::UnknownProvider { id: 9 })
    ));
}

#[test]
fn duplicate_runtime_id_is_rejected() {
    let mut builder = StreamBuilder::new();
    builder
        .register_provider(1, "a", "A", 1, &[])
        .register_provider(1, "b", "B", 1, &[]);
    assert!(matches!(
        decode(&builder),
        Err(TelemetryError::DuplicateProvider { id: 1 })
    ));
}

#[test]
fn unknown_type_and_unit_tags() {
    // register_provider with one field whose type tag is 99.
    let mut builder = StreamBuilder::new();
    builder.raw(&[0, 1, b'p', 1, b'P', 1, 0, 1, 0, 1, 0, 0, 0, 0, 99, 0, 0]);
    assert!(matches!(
        decode(&builder),
        Err(TelemetryError::UnknownValueType { tag: 99, .. })
    ));

    let mut builder = StreamBuilder::new();
    builder.raw(&[0, 1, b'p', 1, b'P', 1, 0, 1, 0, 1, 0, 0, 0, 0, 10, 42, 0]);
    assert!(matches!(
        decode(&builder),
        Err(TelemetryError::UnknownUnit { tag: 42, .. })
    ));
}

#[test]
fn truncated_packet() {
    let mut builder = StreamBuilder::new();
    builder.register_provider(1, "p", "P", 1, &[(0, ValueType::F64, Unit::Value, "a")]);
    let mut data = builder.packet(1, 0.0, &[(0, TypedValue::F64(1.0))]).finish();
    data.truncate(data.len() - 3);

    assert!(matches!(
        parse_telemetry(&data, &ParserOptions::default()),
        Err(TelemetryError::UnexpectedEndOfStream { .. })
    ));
}

#[test]
fn multiple_packets_in_one_command() {
    let first: &[(u8, TypedValue)] = &[(0, TypedValue::U32(1024)), (1, TypedValue::Bool(false))];
    let second: &[(u8, TypedValue)] = &[(0, TypedValue::U32(2048))];

    let mut builder = StreamBuilder::new();
    builder
        .register_provider(
            3,
            "p",
            "P",
            1,
            &[
                (0, ValueType::U32, Unit::Memory, "mem"),
                (1, ValueType::Bool, Unit::Value, "paused"),
            ],
        )
        .packets(3, &[(0.5, first), (1.5, second)]);

    let container = decode(&builder).unwrap();
    let provider = container.provider(3).unwrap();
    assert_eq!(provider.field(0).unwrap().sample_count(), 2);
    assert_eq!(provider.field(1).unwrap().sample_count(), 1);
    assert_eq!((container.start_time, container.end_time), (0.0, 2.0));
}

// ============================================================================
// Values
// ============================================================================

#[test]
fn every_value_type_decodes() {
    let values = [
        TypedValue::Bool(true),
        TypedValue::U8(200),
        TypedValue::U16(60_000),
        TypedValue::U32(4_000_000_000),
        TypedValue::U64(u64::MAX - 1),
        TypedValue::I32(-123_456),
        TypedValue::I64(i64::MIN + 1),
        TypedValue::F32(1.25),
        TypedValue::F64(-0.015625),
        TypedValue::Vec2([1.5, -2.5]),
        TypedValue::DVec2([0.001, 1e9]),
        TypedValue::String("gr\u{fc}n".into()),
    ];

    let fields: Vec<(u8, ValueType, Unit, &str)> = values
        .iter()
        .enumerate()
        .map(|(i, v)| (i as u8, v.value_type(), Unit::Value, "f"))
        .collect();
    let payload: Vec<(u8, TypedValue)> = values
        .iter()
        .enumerate()
        .map(|(i, v)| (i as u8, v.clone()))
        .collect();

    let mut builder = StreamBuilder::new();
    builder
        .register_provider(1, "p", "P", 1, &fields)
        .packet(1, 0.0, &payload)
        .statistic("all", &[("u8", TypedValue::U8(1)), ("s", TypedValue::String("x".into()))]);

    let container = decode(&builder).unwrap();
    let provider = container.provider(1).unwrap();
    for (i, value) in values.iter().enumerate() {
        assert_eq!(&provider.field(i as u8).unwrap().samples()[0].value, value);
    }

    let statistic = &container.statistics()[0];
    assert_eq!(statistic.title, "all");
    assert_eq!(statistic.get("s"), Some(&TypedValue::String("x".into())));
}

#[test]
fn non_finite_floats_become_zero() {
    let mut builder = StreamBuilder::new();
    builder
        .register_provider(1, "p", "P", 1, &[(0, ValueType::F64, Unit::Value, "a")])
        .packet(1, 0.0, &[(0, TypedValue::F64(f64::NAN))])
        .packet(1, f64::INFINITY, &[(0, TypedValue::F64(f64::NEG_INFINITY))]);

    let container = decode(&builder).unwrap();
    let samples = container.provider(1).unwrap().field(0).unwrap().samples();
    assert_eq!(samples[0].value, TypedValue::F64(0.0));
    assert_eq!(samples[1].timestamp, 0.0);
    assert_eq!(samples[1].value, TypedValue::F64(0.0));
}

// ============================================================================
// Events
// ============================================================================

#[test]
fn event_tree_example() {
    let mut builder = StreamBuilder::new();
    builder
        .span_event(1, 0.0, 10.0, None)
        .span_event(3, 6.0, 9.0, Some(1))
        .span_event(2, 1.0, 5.0, Some(1));

    let container = decode(&builder).unwrap();
    let roots = container.events();
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0].id, 1);

    let children: Vec<u64> = roots[0].children().iter().map(|e| e.id).collect();
    assert_eq!(children, vec![2, 3]);
    assert_eq!(container.find_event(3).unwrap().duration(), 3.0);
    assert_eq!(container.event_count(), 3);
}

#[test]
fn orphaned_event() {
    let mut builder = StreamBuilder::new();
    builder.span_event(5, 0.0, 1.0, Some(4));
    assert!(matches!(
        decode(&builder),
        Err(TelemetryError::OrphanedEvent { id: 5, parent: 4 })
    ));
}

#[test]
fn end_before_begin_is_rejected() {
    let mut builder = StreamBuilder::new();
    builder.span_event(1, 4.0, 3.0, None);
    assert!(matches!(
        decode(&builder),
        Err(TelemetryError::InvalidEventTiming { id: 1, .. })
    ));
}

#[test]
fn deep_event_chain_is_rejected() {
    let mut builder = StreamBuilder::new();
    builder.span_event(1, 0.0, 1.0, None);
    for id in 2..=300_000u64 {
        builder.span_event(id, 0.0, 1.0, Some(id - 1));
    }

    let err = decode(&builder).unwrap_err();
    assert!(matches!(
        err,
        TelemetryError::EventNestingTooDeep { limit: MAX_EVENT_DEPTH, .. }
    ));
}

#[test]
fn event_chain_within_limit_decodes_and_drops() {
    let mut builder = StreamBuilder::new();
    builder.span_event(1, 0.0, 1.0, None);
    for id in 2..=MAX_EVENT_DEPTH as u64 {
        builder.span_event(id, 0.0, 1.0, Some(id - 1));
    }

    let container = decode(&builder).unwrap();
    assert_eq!(container.event_count(), MAX_EVENT_DEPTH);
    assert!(container.find_event(MAX_EVENT_DEPTH as u64).is_some());
    assert_eq!(container.clone(), container);
    drop(container);
}

#[test]
fn meta_events_add_attributes_only() {
    let mut builder = StreamBuilder::new();
    builder
        .event(1, 2.0, EventKind::End, &[])
        .event(1, 99.0, EventKind::Meta, &[("name", TypedValue::String("load".into()))])
        .event(1, 1.0, EventKind::Begin, &[("size", TypedValue::U32(3))]);

    let container = decode(&builder).unwrap();
    let event = &container.events()[0];
    assert_eq!((event.start_time, event.end_time), (1.0, 2.0));
    assert_eq!(event.attributes.len(), 2);
    assert_eq!(event.attribute("name"), Some(&TypedValue::String("load".into())));
}

#[test]
fn parent_attribute_is_hidden() {
    let mut builder = StreamBuilder::new();
    builder
        .span_event(1, 0.0, 2.0, None)
        .event(2, 0.5, EventKind::Begin, &[("parent", TypedValue::U8(1)), ("k", TypedValue::Bool(true))])
        .event(2, 1.0, EventKind::End, &[]);

    let container = decode(&builder).unwrap();
    let child = container.find_event(2).unwrap();
    assert!(child.attribute("parent").is_none());
    assert_eq!(child.attributes.len(), 1);
    assert!(container.events()[0].has_child(2));
}

#[test]
fn unknown_event_kind() {
    let mut builder = StreamBuilder::new();
    builder.raw(&[4]);
    builder.raw(&1u64.to_le_bytes());
    builder.raw(&0.0f64.to_le_bytes());
    builder.raw(&[b'x', 0, 0, 0, 0]);

    assert!(matches!(
        decode(&builder),
        Err(TelemetryError::UnknownEventKind { kind: b'x', offset: 25 })
    ));
}

// ============================================================================
// Post-processing
// ============================================================================

#[test]
fn decimating_processor_pads_to_range() {
    let mut builder = StreamBuilder::new();
    builder.register_provider(
        1,
        "p",
        "P",
        1,
        &[
            (0, ValueType::F32, Unit::Value, "dense"),
            (1, ValueType::F32, Unit::Value, "sparse"),
        ],
    );
    for i in 0..500 {
        let t = 0.25 + i as f64 * 0.02;
        builder.packet(1, t, &[(0, TypedValue::F32((i % 13) as f32))]);
    }
    builder.packet(1, 4.0, &[(1, TypedValue::F32(1.0))]);

    let options = ParserOptions::new().with_processor(DecimatingProcessor::new(50, true));
    let container = parse_telemetry(&builder.finish(), &options).unwrap();
    assert_eq!((container.start_time, container.end_time), (0.0, 11.0));

    let provider = container.provider(1).unwrap();
    let dense = provider.field(0).unwrap().samples();
    assert_eq!(dense.len(), 52);
    assert_eq!(dense.first().unwrap().timestamp, 0.0);
    assert_eq!(dense.last().unwrap().timestamp, 11.0);

    let sparse = provider.field(1).unwrap().samples();
    let times: Vec<f64> = sparse.iter().map(|p| p.timestamp).collect();
    assert_eq!(times, vec![0.0, 4.0, 11.0]);
}

#[test]
fn performance_domains() {
    let mut builder = StreamBuilder::new();
    builder
        .register_provider(
            2,
            TIMING_PROVIDER,
            "Timing",
            1,
            &[
                (0, ValueType::F32, Unit::Time, "cpu"),
                (1, ValueType::F32, Unit::Time, "gpu"),
                (3, ValueType::F32, Unit::Time, "frame"),
            ],
        )
        .packet(2, 1.0, &[(0, TypedValue::F32(0.010)), (1, TypedValue::F32(0.008)), (3, TypedValue::F32(0.016))])
        .packet(2, 2.0, &[(0, TypedValue::F32(0.012)), (1, TypedValue::F32(0.009)), (3, TypedValue::F32(0.017))]);

    let container = decode(&builder).unwrap();
    let data = PerformanceData::new(&container, 0.0, 10.0);

    assert!(data.contains_data());
    assert!(data.calculator(TimeDomain::Fps).is_none());
    let domains: Vec<TimeDomain> = data.domains().collect();
    assert_eq!(domains, vec![TimeDomain::Cpu, TimeDomain::Gpu, TimeDomain::FrameTime]);
    assert_eq!(data.calculator(TimeDomain::FrameTime).unwrap().sample_count(), 2);
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// The time range is floor/ceil of the true sample extremes.
    #[test]
    fn time_range_brackets_samples(timestamps in prop::collection::vec(-500.0..500.0f64, 1..60)) {
        let mut builder = StreamBuilder::new();
        builder.register_provider(1, "p", "P", 1, &[(0, ValueType::U8, Unit::Value, "a")]);
        for t in &timestamps {
            builder.packet(1, *t, &[(0, TypedValue::U8(0))]);
        }

        let container = decode(&builder).unwrap();
        let min = timestamps.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = timestamps.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        prop_assert_eq!(container.start_time, min.floor());
        prop_assert_eq!(container.end_time, max.ceil());
    }

    /// Arbitrary bytes after a valid header never panic the decoder.
    #[test]
    fn garbage_never_panics(body in prop::collection::vec(any::<u8>(), 0..256)) {
        let mut builder = StreamBuilder::new();
        builder.raw(&body);
        let _ = decode(&builder);
    }
}
