use std::sync::Arc;
use std::thread;

use llkv_sqlsmith::SmithCatalogs;
use llkv_types::builtins::FunctionClass;
use llkv_types::{ANY_NON_ARRAY, SqlType};

fn operator_snapshot(catalogs: &SmithCatalogs) -> Vec<(u32, Vec<String>)> {
    let mut keys: Vec<_> = catalogs.operators.return_types().collect();
    keys.sort();
    keys.into_iter()
        .map(|oid| {
            let entries = catalogs
                .operators
                .returning(oid)
                .iter()
                .map(|e| format!("{} {} {}", e.overload.left, e.operator, e.overload.right))
                .collect();
            (oid.0, entries)
        })
        .collect()
}

fn function_snapshot(catalogs: &SmithCatalogs) -> Vec<(FunctionClass, u32, Vec<&'static str>)> {
    let mut keys: Vec<_> = catalogs.functions.keys().collect();
    keys.sort();
    keys.into_iter()
        .map(|(class, oid)| {
            let names = catalogs
                .functions
                .returning(class, oid)
                .iter()
                .map(|e| e.def.name)
                .collect();
            (class, oid.0, names)
        })
        .collect()
}

#[test]
fn catalogs_are_deterministic() {
    let first = SmithCatalogs::build();
    let second = SmithCatalogs::build();
    assert_eq!(operator_snapshot(&first), operator_snapshot(&second));
    assert_eq!(function_snapshot(&first), function_snapshot(&second));
}

#[test]
fn shared_catalogs_are_readable_from_many_threads() {
    let catalogs = Arc::new(SmithCatalogs::build());
    let expected = catalogs.functions.len();
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let catalogs = Arc::clone(&catalogs);
            thread::spawn(move || {
                let ints = catalogs.operators.returning(SqlType::INT.oid).len();
                (catalogs.functions.len(), ints)
            })
        })
        .collect();
    for handle in handles {
        let (functions, ints) = handle.join().expect("catalog thread");
        assert_eq!(functions, expected);
        assert!(ints > 0);
    }
}

#[test]
fn shared_catalogs_answer_typed_lookups() {
    let catalogs = Arc::new(SmithCatalogs::build());

    let ints = catalogs.operators.returning(SqlType::INT.oid);
    assert!(ints.iter().any(|e| e.operator.symbol() == "+"));
    assert!(!catalogs.operators.returning(SqlType::INT_ARRAY.oid).is_empty());

    for (class, oid) in catalogs.functions.keys() {
        for entry in catalogs.functions.returning(class, oid) {
            let ret = entry.overload.fixed_return_type();
            assert!(ANY_NON_ARRAY.iter().any(|ty| ty.family == ret.family));
        }
    }
    let lengths = catalogs
        .functions
        .returning(FunctionClass::Normal, SqlType::INT.oid);
    assert!(lengths.iter().any(|e| e.def.name == "length"));
    assert!(
        catalogs
            .functions
            .returning(FunctionClass::Normal, SqlType::STRING_ARRAY.oid)
            .is_empty()
    );
}
