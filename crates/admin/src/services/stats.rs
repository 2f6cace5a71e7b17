//! Dashboard aggregations over the order and book lists.
//!
//! All functions here are pure so the numbers shown on the dashboard
//! can be pinned down in unit tests without a backend.

use chrono::{DateTime, Utc};
use maktaba_api::types::{Book, Category, Order};

/// Seven daily buckets of units sold, oldest day first. Index 6 is today.
pub type WeeklySales = [u32; 7];

/// Sum units sold per day over the trailing week.
///
/// An order dated `d` days ago lands in bucket `6 - d`; orders older than
/// a week or dated in the future are skipped.
#[must_use]
pub fn weekly_sales(orders: &[Order], now: DateTime<Utc>) -> WeeklySales {
    let mut buckets: WeeklySales = [0; 7];

    for order in orders {
        let diff_days = (now - order.created_at).num_days();
        if !(0..7).contains(&diff_days) {
            continue;
        }
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        let bucket = (6 - diff_days) as usize;
        buckets[bucket] += order.unit_count();
    }

    buckets
}

/// Week-over-today growth percentage for the sales chart headline.
///
/// Compares today's units against the sum of the six preceding days.
/// Yields 0 when there is no history to compare against, which also
/// keeps NaN and infinity out of the template.
#[must_use]
pub fn growth_rate(buckets: &WeeklySales) -> i64 {
    let prev6: u32 = buckets[..6].iter().sum();
    if prev6 == 0 {
        return 0;
    }

    let today = f64::from(buckets[6]);
    let prev6 = f64::from(prev6);
    #[allow(clippy::cast_possible_truncation)]
    let rate = ((today - prev6) / prev6 * 100.0).round() as i64;
    rate
}

/// One slice of the genre pie chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreSlice {
    pub name: String,
    pub count: usize,
}

/// Count catalog titles per category, dropping empty categories.
///
/// A book tagged with several categories counts once in each. Slices keep
/// the order the backend lists categories in.
#[must_use]
pub fn genre_distribution(categories: &[Category], books: &[Book]) -> Vec<GenreSlice> {
    categories
        .iter()
        .filter_map(|category| {
            let count = books
                .iter()
                .filter(|book| book.categories.iter().any(|c| c.id == category.id))
                .count();
            (count > 0).then(|| GenreSlice {
                name: category.name.clone(),
                count,
            })
        })
        .collect()
}

/// Gross revenue across every order in the list.
#[must_use]
pub fn total_revenue(orders: &[Order]) -> f64 {
    orders.iter().map(|order| order.total).sum()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use maktaba_api::types::{CategoryRef, OrderItem};
    use maktaba_core::{BookId, CategoryId, OrderId, OrderStatus};

    use super::*;

    fn order_at(days_ago: i64, qty: u32, total: f64, now: DateTime<Utc>) -> Order {
        Order {
            id: OrderId::new(format!("order-{days_ago}-{qty}")),
            user: None,
            items: vec![OrderItem {
                title: Some("Dune".into()),
                quantity: qty,
                price: Some(total),
            }],
            total,
            status: OrderStatus::Paid,
            created_at: now - chrono::Duration::days(days_ago),
            shipping_address: None,
        }
    }

    fn book_in(categories: &[(&str, &str)]) -> Book {
        Book {
            id: BookId::new("bk1"),
            title: "Dune".into(),
            author: "Frank Herbert".into(),
            price: 9.5,
            stock: 3,
            language: None,
            description: None,
            cover_url: None,
            categories: categories
                .iter()
                .map(|&(id, name)| CategoryRef {
                    id: CategoryId::new(id),
                    name: name.into(),
                })
                .collect(),
        }
    }

    fn category(id: &str, name: &str) -> Category {
        Category {
            id: CategoryId::new(id),
            name: name.into(),
            slug: None,
        }
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn buckets_run_oldest_to_today() {
        let now = fixed_now();
        let orders = vec![
            order_at(0, 2, 10.0, now),
            order_at(3, 5, 10.0, now),
            order_at(6, 1, 10.0, now),
        ];

        let buckets = weekly_sales(&orders, now);
        assert_eq!(buckets, [1, 0, 0, 5, 0, 0, 2]);
    }

    #[test]
    fn orders_outside_the_window_are_skipped() {
        let now = fixed_now();
        let orders = vec![
            order_at(7, 4, 10.0, now),
            order_at(30, 9, 10.0, now),
            order_at(-1, 3, 10.0, now),
        ];

        assert_eq!(weekly_sales(&orders, now), [0; 7]);
    }

    #[test]
    fn multiple_items_sum_their_quantities() {
        let now = fixed_now();
        let mut order = order_at(0, 2, 30.0, now);
        order.items.push(OrderItem {
            title: Some("Hamlet".into()),
            quantity: 3,
            price: Some(5.0),
        });

        assert_eq!(weekly_sales(&[order], now)[6], 5);
    }

    #[test]
    fn growth_compares_today_to_prior_six_days() {
        // 10 units over the prior six days, 15 today: +50%.
        let buckets: WeeklySales = [2, 2, 2, 2, 1, 1, 15];
        assert_eq!(growth_rate(&buckets), 50);
    }

    #[test]
    fn growth_is_zero_without_history() {
        let buckets: WeeklySales = [0, 0, 0, 0, 0, 0, 12];
        assert_eq!(growth_rate(&buckets), 0);
    }

    #[test]
    fn growth_can_be_negative() {
        let buckets: WeeklySales = [5, 5, 5, 5, 0, 0, 10];
        assert_eq!(growth_rate(&buckets), -50);
    }

    #[test]
    fn growth_rounds_to_nearest_percent() {
        // (1 - 3) / 3 * 100 = -66.66... -> -67
        let buckets: WeeklySales = [3, 0, 0, 0, 0, 0, 1];
        assert_eq!(growth_rate(&buckets), -67);
    }

    #[test]
    fn genre_counts_each_category_tag_in_listing_order() {
        let categories = vec![category("c1", "Fiction"), category("c2", "Classics")];
        let books = vec![
            book_in(&[("c1", "Fiction"), ("c2", "Classics")]),
            book_in(&[("c1", "Fiction")]),
        ];

        let slices = genre_distribution(&categories, &books);
        assert_eq!(
            slices,
            vec![
                GenreSlice {
                    name: "Fiction".into(),
                    count: 2
                },
                GenreSlice {
                    name: "Classics".into(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn genre_drops_categories_without_titles() {
        let categories = vec![category("c1", "Fiction"), category("c3", "Poetry")];
        let books = vec![book_in(&[("c1", "Fiction")])];

        let slices = genre_distribution(&categories, &books);
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].name, "Fiction");
    }

    #[test]
    fn genre_skips_untagged_books() {
        let categories = vec![category("c1", "Fiction")];
        let books = vec![book_in(&[])];
        assert!(genre_distribution(&categories, &books).is_empty());
    }

    #[test]
    fn revenue_sums_order_totals() {
        let now = fixed_now();
        let orders = vec![
            order_at(0, 1, 12.5, now),
            order_at(2, 1, 7.5, now),
            order_at(9, 1, 100.0, now),
        ];

        let revenue = total_revenue(&orders);
        assert!((revenue - 120.0).abs() < f64::EPSILON);
    }
}
