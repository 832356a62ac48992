//! Concurrent first use of the symbol table.

use std::sync::Arc;

use firerules::grammar::{EmbeddedGrammar, SymbolTableCell};

#[tokio::test]
async fn test_concurrent_first_queries_share_one_table() {
    let cell = SymbolTableCell::new(Arc::new(EmbeddedGrammar));
    let (a, b, c) = tokio::join!(cell.get(), cell.get(), cell.get());
    let a = a.unwrap();
    assert!(Arc::ptr_eq(&a, &b.unwrap()));
    assert!(Arc::ptr_eq(&a, &c.unwrap()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_tasks_share_one_table() {
    let cell = Arc::new(SymbolTableCell::new(Arc::new(EmbeddedGrammar)));
    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let cell = Arc::clone(&cell);
            tokio::spawn(async move { cell.get().await.unwrap() })
        })
        .collect();

    let mut tables = Vec::new();
    for task in tasks {
        tables.push(task.await.unwrap());
    }
    assert!(tables.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
}

#[tokio::test]
async fn test_forced_compile_replaces_table() {
    let cell = SymbolTableCell::new(Arc::new(EmbeddedGrammar));
    let first = cell.get().await.unwrap();
    let second = cell.compile(true).await.unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(first.type_count(), second.type_count());
}
