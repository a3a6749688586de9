//! Scalar, date/time, and dispatcher fallback behavior through the
//! public API.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime, TimeDelta};
use tabwire_json::model::{
    Datum, Decimal, NdBuffer, ObjectLike, TimeUnit, ToDict, NAT,
};
use tabwire_json::{encode, EncodeOptions, Orient};

fn enc(d: &Datum) -> String {
    encode(d, &EncodeOptions::default()).unwrap()
}

#[test]
fn test_scalar_literals() {
    assert_eq!(enc(&Datum::Null), "null");
    assert_eq!(enc(&Datum::Bool(true)), "true");
    assert_eq!(enc(&Datum::Bool(false)), "false");
    assert_eq!(enc(&Datum::Int(42)), "42");
    assert_eq!(enc(&Datum::Int(-7)), "-7");
    assert_eq!(enc(&Datum::Int(0)), "0");
    assert_eq!(enc(&Datum::UInt(9)), "9");
    assert_eq!(enc(&Datum::Float(1.0)), "1.0");
    assert_eq!(enc(&Datum::Float(3.14)), "3.14");
    assert_eq!(enc(&Datum::from("hi")), r#""hi""#);
    assert_eq!(enc(&Datum::Bytes(b"raw".to_vec())), r#""raw""#);
}

#[test]
fn test_plain_mapping() {
    let d = Datum::Map(vec![
        (Datum::from("a"), Datum::Int(1)),
        (Datum::from("b"), Datum::Null),
    ]);
    assert_eq!(enc(&d), r#"{"a":1,"b":null}"#);
}

#[test]
fn test_nan_and_inf_are_null() {
    assert_eq!(enc(&Datum::Float(f64::NAN)), "null");
    assert_eq!(enc(&Datum::Float(f64::INFINITY)), "null");
    assert_eq!(enc(&Datum::Float(f64::NEG_INFINITY)), "null");
}

#[test]
fn test_decimal_is_lossy_double() {
    assert_eq!(enc(&Datum::Decimal(Decimal::new(314, 2))), "3.14");
}

#[test]
fn test_uint_overflow_rejected() {
    let err = encode(&Datum::UInt(u64::MAX), &EncodeOptions::default()).unwrap_err();
    assert!(err.to_string().contains("out of range"));
}

#[test]
fn test_invalid_utf8_bytes_rejected() {
    let err = encode(&Datum::Bytes(vec![0xFF, 0xFE]), &EncodeOptions::default()).unwrap_err();
    assert_eq!(err.to_string(), "byte string is not valid UTF-8");
}

#[test]
fn test_datetime_epoch_seconds() {
    let dt = NaiveDate::from_ymd_opt(1970, 1, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let opts = EncodeOptions::default().with_date_unit(TimeUnit::Seconds);
    assert_eq!(encode(&Datum::DateTime(dt), &opts).unwrap(), "86400");
}

#[test]
fn test_datetime_iso_millis() {
    let dt = NaiveDate::from_ymd_opt(1970, 1, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let opts = EncodeOptions::default().with_iso_dates(true);
    assert_eq!(
        encode(&Datum::DateTime(dt), &opts).unwrap(),
        r#""1970-01-02T00:00:00.000""#
    );
    let opts = opts.with_date_unit(TimeUnit::Seconds);
    assert_eq!(
        encode(&Datum::DateTime(dt), &opts).unwrap(),
        r#""1970-01-02T00:00:00""#
    );
}

#[test]
fn test_date_is_midnight() {
    let d = Datum::Date(NaiveDate::from_ymd_opt(1970, 1, 2).unwrap());
    let opts = EncodeOptions::default().with_date_unit(TimeUnit::Seconds);
    assert_eq!(encode(&d, &opts).unwrap(), "86400");
}

#[test]
fn test_timestamp64_rescales() {
    let ts = Datum::Timestamp64 {
        value: 1_500,
        unit: TimeUnit::Millis,
    };
    let s = EncodeOptions::default().with_date_unit(TimeUnit::Seconds);
    assert_eq!(encode(&ts, &s).unwrap(), "1");
    let ns = EncodeOptions::default().with_date_unit(TimeUnit::Nanos);
    assert_eq!(encode(&ts, &ns).unwrap(), "1500000000");
}

#[test]
fn test_nat_is_null_in_both_modes() {
    let ts = Datum::Timestamp64 {
        value: NAT,
        unit: TimeUnit::Nanos,
    };
    for iso in [false, true] {
        let opts = EncodeOptions::default().with_iso_dates(iso);
        assert_eq!(encode(&ts, &opts).unwrap(), "null");
    }
}

#[test]
fn test_nat_is_null_inside_arrays() {
    let buf = NdBuffer::from_datetime64(vec![0, NAT], TimeUnit::Millis);
    let d = Datum::Array(buf);
    let epoch = EncodeOptions::default();
    assert_eq!(encode(&d, &epoch).unwrap(), "[0,null]");
    let iso = EncodeOptions::default().with_iso_dates(true);
    assert_eq!(
        encode(&d, &iso).unwrap(),
        r#"["1970-01-01T00:00:00.000",null]"#
    );
}

#[test]
fn test_time_of_day_is_iso_text() {
    let t = Datum::Time(NaiveTime::from_hms_opt(9, 30, 5).unwrap());
    // Time of day ignores the date format flag.
    for iso in [false, true] {
        let opts = EncodeOptions::default().with_iso_dates(iso);
        assert_eq!(encode(&t, &opts).unwrap(), r#""09:30:05""#);
    }
}

#[test]
fn test_duration_rescales() {
    let d = Datum::Duration(TimeDelta::milliseconds(1_500));
    assert_eq!(enc(&d), "1500");
    let opts = EncodeOptions::default().with_date_unit(TimeUnit::Seconds);
    assert_eq!(encode(&d, &opts).unwrap(), "1");
}

#[test]
fn test_tuple_and_set_are_arrays() {
    let t = Datum::Tuple(vec![Datum::Int(1), Datum::from("a")]);
    assert_eq!(enc(&t), r#"[1,"a"]"#);
    let s = Datum::Set(vec![Datum::Int(2), Datum::Int(1)]);
    assert_eq!(enc(&s), "[2,1]");
}

#[test]
fn test_double_precision_option() {
    let opts = EncodeOptions::default().with_double_precision(2);
    assert_eq!(encode(&Datum::Float(0.125), &opts).unwrap(), "0.12");
}

#[test]
fn test_precision_out_of_range_rejected_before_output() {
    let opts = EncodeOptions::default().with_double_precision(16);
    let err = encode(&Datum::Int(1), &opts).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid value '16' for option 'double_precision', max is '15'"
    );
}

#[test]
fn test_orient_and_date_unit_parse_errors() {
    let err = "diagonal".parse::<Orient>().unwrap_err();
    assert_eq!(err.to_string(), "Invalid value 'diagonal' for option 'orient'");
    let err = tabwire_json::parse_date_unit("weeks").unwrap_err();
    assert_eq!(err.to_string(), "Invalid value 'weeks' for option 'date_unit'");
}

#[test]
fn test_ensure_ascii_toggle() {
    let d = Datum::from("ü");
    assert_eq!(enc(&d), "\"\\u00fc\"");
    let opts = EncodeOptions::default().with_ensure_ascii(false);
    assert_eq!(encode(&d, &opts).unwrap(), "\"ü\"");
}

#[test]
fn test_encode_html_chars_toggle() {
    let d = Datum::from("<a>&");
    let opts = EncodeOptions::default().with_encode_html_chars(true);
    assert_eq!(encode(&d, &opts).unwrap(), "\"\\u003ca\\u003e\\u0026\"");
    assert_eq!(enc(&d), r#""<a>&""#);
}

#[test]
fn test_zero_dim_array_rejected() {
    let buf = NdBuffer::from_i64(vec![1]).with_shape(vec![]).unwrap();
    let err = encode(&Datum::Array(buf), &EncodeOptions::default()).unwrap_err();
    assert_eq!(err.to_string(), "0-d array is not JSON serializable");
}

#[test]
fn test_recursion_limit_via_options() {
    let mut d = Datum::Int(0);
    for _ in 0..32 {
        d = Datum::List(vec![d]);
    }
    let opts = EncodeOptions::default().with_recursion_limit(8);
    let err = encode(&d, &opts).unwrap_err();
    assert_eq!(err.to_string(), "Maximum recursion level reached");
}

// ── opaque values ──────────────────────────────────────────────────

#[derive(Debug)]
struct Resource;

impl ObjectLike for Resource {
    fn attr_names(&self) -> Vec<String> {
        ["_hidden", "refresh", "kind", "missing", "count"]
            .iter()
            .map(|s| (*s).to_owned())
            .collect()
    }

    fn attr(&self, name: &str) -> Option<Datum> {
        match name {
            "kind" => Some(Datum::from("widget")),
            "count" => Some(Datum::Int(2)),
            "refresh" => Some(Datum::Int(0)),
            _ => None,
        }
    }

    fn is_callable(&self, name: &str) -> bool {
        name == "refresh"
    }
}

#[derive(Debug)]
struct DictLike;

impl ObjectLike for DictLike {
    fn attr_names(&self) -> Vec<String> {
        Vec::new()
    }

    fn attr(&self, _name: &str) -> Option<Datum> {
        None
    }

    fn to_dict(&self) -> ToDict {
        ToDict::Dict(vec![(Datum::from("k"), Datum::Int(1))])
    }
}

#[derive(Debug)]
struct BrokenDict;

impl ObjectLike for BrokenDict {
    fn attr_names(&self) -> Vec<String> {
        Vec::new()
    }

    fn attr(&self, _name: &str) -> Option<Datum> {
        None
    }

    fn to_dict(&self) -> ToDict {
        ToDict::Failed
    }
}

#[test]
fn test_attribute_iteration_skips_private_and_callable() {
    let d = Datum::Other(Arc::new(Resource));
    assert_eq!(enc(&d), r#"{"kind":"widget","count":2}"#);
}

#[test]
fn test_mapping_conversion_preferred() {
    let d = Datum::Other(Arc::new(DictLike));
    assert_eq!(enc(&d), r#"{"k":1}"#);
}

#[test]
fn test_failed_mapping_conversion_encodes_null() {
    let d = Datum::Other(Arc::new(BrokenDict));
    assert_eq!(enc(&d), "null");
}

// ── default handler ────────────────────────────────────────────────

fn handler_opts(
    f: impl Fn(&Datum) -> Result<Datum, String> + Send + Sync + 'static,
) -> EncodeOptions {
    EncodeOptions::default().with_default_handler(Arc::new(f))
}

#[test]
fn test_complex_scalar_needs_handler() {
    let d = Datum::Complex { re: 1.0, im: 2.0 };
    let err = encode(&d, &EncodeOptions::default()).unwrap_err();
    assert_eq!(err.to_string(), "complex value is not JSON serializable");

    let opts = handler_opts(|d| match d {
        Datum::Complex { re, im } => Ok(Datum::from(format!("({re}+{im}j)"))),
        _ => Err("unexpected".into()),
    });
    assert_eq!(encode(&d, &opts).unwrap(), r#""(1+2j)""#);
}

#[test]
fn test_unhandled_dtype_inside_array() {
    let buf = NdBuffer::from_complex128(vec![(1.0, 2.0), (3.0, 4.0)]);
    let d = Datum::Array(buf);
    let err = encode(&d, &EncodeOptions::default()).unwrap_err();
    assert_eq!(err.to_string(), "Unhandled dtype 15");

    let opts = handler_opts(|d| match d {
        Datum::Complex { re, .. } => Ok(Datum::Float(*re)),
        _ => Err("unexpected".into()),
    });
    assert_eq!(encode(&d, &opts).unwrap(), "[1.0,3.0]");
}

#[test]
fn test_handler_result_recurses_through_dispatcher() {
    let opts = handler_opts(|_| Ok(Datum::List(vec![Datum::Int(1), Datum::Null])));
    let d = Datum::Complex { re: 0.0, im: 0.0 };
    assert_eq!(encode(&d, &opts).unwrap(), "[1,null]");
}

#[test]
fn test_handler_failure_surfaces() {
    let opts = handler_opts(|_| Err("boom".into()));
    let d = Datum::Complex { re: 0.0, im: 0.0 };
    let err = encode(&d, &opts).unwrap_err();
    assert_eq!(err.to_string(), "Failed to execute default handler");
}

#[test]
fn test_runaway_handler_stopped_by_recursion_guard() {
    // A handler that returns another unencodable value recurses until
    // the depth guard trips.
    let opts = handler_opts(|_| Ok(Datum::Complex { re: 0.0, im: 0.0 }))
        .with_recursion_limit(16);
    let d = Datum::Complex { re: 0.0, im: 0.0 };
    let err = encode(&d, &opts).unwrap_err();
    assert_eq!(err.to_string(), "Maximum recursion level reached");
}
