use cart_store::{Cart, CartItem, CartItemStore, CartStore, Discount, MemoryStore, Product, User};
use common::Money;
use criterion::{Criterion, criterion_group, criterion_main};
use domain::LockRegistry;
use processing::{OrderProcessor, ProcessingConfig, pricing};
use rust_decimal::Decimal;

fn bench_line_total(c: &mut Criterion) {
    let price = Money::with_scale(120000, 2);
    let discount = Discount::new("Electronics", Decimal::from(10));

    c.bench_function("pricing/line_total_discounted", |b| {
        b.iter(|| pricing::line_total(std::hint::black_box(price), 2, Some(&discount)));
    });

    c.bench_function("pricing/line_total_undiscounted", |b| {
        b.iter(|| pricing::line_total(std::hint::black_box(price), 2, None));
    });
}

fn bench_process_order(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("processing/process_20_line_order", |b| {
        b.iter(|| {
            rt.block_on(async {
                let store = MemoryStore::new();
                let user = store.seed_user(User::new("bench")).await;
                store
                    .seed_discount(Discount::new("Electronics", Decimal::from(10)))
                    .await;
                let cart = store.save_cart(Cart::new(user.id)).await.unwrap();
                for i in 0..20 {
                    let product = store
                        .seed_product(Product::new(
                            format!("BENCH{i:03}"),
                            "Benchmark Widget",
                            Money::with_scale(999, 2),
                            "Electronics",
                        ))
                        .await;
                    store
                        .save_item(CartItem::new(cart.id, product.id, 2))
                        .await
                        .unwrap();
                }

                let processor = OrderProcessor::with_config(
                    store,
                    LockRegistry::new(),
                    ProcessingConfig::immediate(),
                );
                processor.process_order(cart.id).join().await.unwrap();
            });
        });
    });
}

criterion_group!(benches, bench_line_total, bench_process_order);
criterion_main!(benches);
