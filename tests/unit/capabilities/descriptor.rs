use super::*;

#[test]
fn json_has_exactly_the_capability_keys() {
    let json = capabilities().to_json();
    let obj = json.as_object().unwrap();
    let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        [
            "ALGORITHMS",
            "COMPILATION_DATE",
            "COMPILATION_TIME",
            "COMPILER",
            "COMPILER_VERSION",
            "COMPRESSION_TYPES",
            "FEATURES",
            "FILTER_TYPES",
            "LIBPNG_VERSION",
            "PLATFORM_CPU_BITS",
            "VERSION",
        ]
    );
}

#[test]
fn repeated_calls_return_the_same_instance() {
    assert!(std::ptr::eq(capabilities(), capabilities()));
}

#[test]
fn lists_are_parseable_option_names() {
    let caps = capabilities();
    assert_eq!(caps.algorithms.len(), BUILTIN_ALGORITHMS.len());
    for name in &caps.compression_types {
        assert!(name.parse::<CompressionLevel>().is_ok(), "{name}");
    }
    for name in &caps.filter_types {
        assert!(name.parse::<FilterStrategy>().is_ok(), "{name}");
    }
    assert!(caps.features.iter().any(|f| f == "cpu"));
    assert_eq!(caps.platform_cpu_bits, usize::BITS);
    assert_eq!(caps.version, env!("CARGO_PKG_VERSION"));
}

#[test]
fn compilation_stamp_shapes() {
    let caps = capabilities();
    assert_eq!(caps.compilation_time.len(), 8);
    assert_eq!(caps.compilation_time.matches(':').count(), 2);
    assert_eq!(caps.compilation_date.split(' ').count(), 3);
}
