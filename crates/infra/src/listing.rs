//! Product listing: filter → rows → resolved details.
//!
//! Relations are loaded eagerly. The category comes with each product row
//! (one join fetch) and the tags of the whole page come from one batched
//! fetch, so the cost does not grow with the number of products.

use std::collections::{HashMap, HashSet};

use tracing::{instrument, Span};

use novelfinder_catalog::{ProductDetail, ProductFilter, Tag};
use novelfinder_core::ProductId;

use crate::store::{CatalogStore, StoreError};

#[instrument(skip(store), fields(product_count = tracing::field::Empty), err)]
pub async fn list_products<S>(store: &S, filter: &ProductFilter) -> Result<Vec<ProductDetail>, StoreError>
where
    S: CatalogStore + ?Sized,
{
    let mut rows = store.fetch_products(filter).await?;

    // A product reachable through several requested tags is listed once.
    let mut seen = HashSet::with_capacity(rows.len());
    rows.retain(|row| seen.insert(row.product.id_typed()));

    if rows.is_empty() {
        Span::current().record("product_count", 0usize);
        return Ok(vec![]);
    }

    let ids: Vec<ProductId> = rows.iter().map(|row| row.product.id_typed()).collect();
    let mut tags_by_product: HashMap<ProductId, Vec<Tag>> = HashMap::with_capacity(ids.len());
    for (product_id, tag) in store.fetch_tags(&ids).await? {
        tags_by_product.entry(product_id).or_default().push(tag);
    }

    let details = rows
        .into_iter()
        .map(|row| {
            let tags = tags_by_product
                .remove(&row.product.id_typed())
                .unwrap_or_default();
            ProductDetail::assemble(row.product, row.category, tags).map_err(StoreError::from)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Span::current().record("product_count", details.len());
    Ok(details)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::store::{InMemoryCatalogStore, ProductRow};
    use novelfinder_catalog::{Category, Product, SearchTerms};
    use novelfinder_core::{CategoryId, TagId};

    /// Wraps a store and counts round-trips per method.
    struct CountingStore {
        inner: InMemoryCatalogStore,
        product_fetches: AtomicUsize,
        tag_fetches: AtomicUsize,
    }

    impl CountingStore {
        fn new(inner: InMemoryCatalogStore) -> Self {
            Self {
                inner,
                product_fetches: AtomicUsize::new(0),
                tag_fetches: AtomicUsize::new(0),
            }
        }

        fn fetches(&self) -> (usize, usize) {
            (
                self.product_fetches.load(Ordering::SeqCst),
                self.tag_fetches.load(Ordering::SeqCst),
            )
        }
    }

    #[async_trait::async_trait]
    impl CatalogStore for CountingStore {
        async fn fetch_products(&self, filter: &ProductFilter) -> Result<Vec<ProductRow>, StoreError> {
            self.product_fetches.fetch_add(1, Ordering::SeqCst);
            self.inner.fetch_products(filter).await
        }

        async fn fetch_tags(&self, product_ids: &[ProductId]) -> Result<Vec<(ProductId, Tag)>, StoreError> {
            self.tag_fetches.fetch_add(1, Ordering::SeqCst);
            self.inner.fetch_tags(product_ids).await
        }

        async fn search_products(&self, terms: &SearchTerms) -> Result<Vec<ProductRow>, StoreError> {
            self.inner.search_products(terms).await
        }

        async fn search_categories(&self, terms: &SearchTerms) -> Result<Vec<Category>, StoreError> {
            self.inner.search_categories(terms).await
        }

        async fn search_tags(&self, terms: &SearchTerms) -> Result<Vec<Tag>, StoreError> {
            self.inner.search_tags(terms).await
        }
    }

    struct Shelf {
        store: InMemoryCatalogStore,
        p1: ProductId,
        p2: ProductId,
        p3: ProductId,
    }

    /// P1{Books,[Fiction]}, P2{Books,[NonFiction]}, P3{Music,[Fiction]}.
    fn shelf() -> Shelf {
        let store = InMemoryCatalogStore::new();
        let books = Category::new(CategoryId::new(), "Books").unwrap();
        let music = Category::new(CategoryId::new(), "Music").unwrap();
        let fiction = Tag::new(TagId::new(), "Fiction").unwrap();
        let non_fiction = Tag::new(TagId::new(), "NonFiction").unwrap();
        store.insert_category(books.clone()).unwrap();
        store.insert_category(music.clone()).unwrap();
        store.insert_tag(fiction.clone()).unwrap();
        store.insert_tag(non_fiction.clone()).unwrap();

        let p1 = Product::new(ProductId::new(), "Dune", "A desert planet saga", books.id_typed()).unwrap();
        let p2 = Product::new(ProductId::new(), "Cosmos", "Carl Sagan on the universe", books.id_typed()).unwrap();
        let p3 = Product::new(ProductId::new(), "Desert Songs", "Ballads of the DESERT", music.id_typed()).unwrap();
        let (id1, id2, id3) = (p1.id_typed(), p2.id_typed(), p3.id_typed());
        store.insert_product(p1, &[fiction.id_typed()]).unwrap();
        store.insert_product(p2, &[non_fiction.id_typed()]).unwrap();
        store.insert_product(p3, &[fiction.id_typed()]).unwrap();

        Shelf { store, p1: id1, p2: id2, p3: id3 }
    }

    fn ids(details: &[ProductDetail]) -> Vec<ProductId> {
        let mut ids: Vec<ProductId> = details.iter().map(|d| d.product.id_typed()).collect();
        ids.sort();
        ids
    }

    fn sorted(mut ids: Vec<ProductId>) -> Vec<ProductId> {
        ids.sort();
        ids
    }

    #[tokio::test]
    async fn unrestricted_listing_returns_everything_resolved() {
        let shelf = shelf();
        let details = list_products(&shelf.store, &ProductFilter::new()).await.unwrap();

        assert_eq!(ids(&details), sorted(vec![shelf.p1, shelf.p2, shelf.p3]));
        for detail in &details {
            assert_eq!(detail.product.category_id(), detail.category.id_typed());
            assert_eq!(detail.tags.len(), 1);
        }
    }

    #[tokio::test]
    async fn tag_filter_selects_p1_and_p3() {
        let shelf = shelf();
        let filter = ProductFilter::new().with_tag("Fiction");
        let details = list_products(&shelf.store, &filter).await.unwrap();
        assert_eq!(ids(&details), sorted(vec![shelf.p1, shelf.p3]));
    }

    #[tokio::test]
    async fn category_filter_selects_p1_and_p2() {
        let shelf = shelf();
        let filter = ProductFilter::new().with_category("Books");
        let details = list_products(&shelf.store, &filter).await.unwrap();
        assert_eq!(ids(&details), sorted(vec![shelf.p1, shelf.p2]));
    }

    #[tokio::test]
    async fn category_and_tag_filters_combine() {
        let shelf = shelf();
        let filter = ProductFilter::new().with_category("Books").with_tag("Fiction");
        let details = list_products(&shelf.store, &filter).await.unwrap();
        assert_eq!(ids(&details), vec![shelf.p1]);
    }

    #[tokio::test]
    async fn repeated_tags_are_or_and_yield_each_product_once() {
        let shelf = shelf();
        let filter = ProductFilter::new().with_tag("Fiction").with_tag("NonFiction");
        let details = list_products(&shelf.store, &filter).await.unwrap();
        assert_eq!(ids(&details), sorted(vec![shelf.p1, shelf.p2, shelf.p3]));
    }

    #[tokio::test]
    async fn product_matching_two_requested_tags_appears_once() {
        let store = InMemoryCatalogStore::new();
        let books = Category::new(CategoryId::new(), "Books").unwrap();
        let a = Tag::new(TagId::new(), "A").unwrap();
        let b = Tag::new(TagId::new(), "B").unwrap();
        store.insert_category(books.clone()).unwrap();
        store.insert_tag(a.clone()).unwrap();
        store.insert_tag(b.clone()).unwrap();
        let product = Product::new(ProductId::new(), "Both", "", books.id_typed()).unwrap();
        store.insert_product(product, &[a.id_typed(), b.id_typed()]).unwrap();

        let filter = ProductFilter::new().with_tag("A").with_tag("B");
        let details = list_products(&store, &filter).await.unwrap();
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].tag_names().collect::<Vec<_>>(), vec!["A", "B"]);
    }

    #[tokio::test]
    async fn description_filter_is_case_insensitive() {
        let shelf = shelf();
        let filter = ProductFilter::new().with_description("desert");
        let details = list_products(&shelf.store, &filter).await.unwrap();
        assert_eq!(ids(&details), sorted(vec![shelf.p1, shelf.p3]));
    }

    #[tokio::test]
    async fn unknown_values_yield_an_empty_list() {
        let shelf = shelf();
        let filter = ProductFilter::new().with_category("Garden");
        assert!(list_products(&shelf.store, &filter).await.unwrap().is_empty());

        let filter = ProductFilter::new().with_tag("Nope");
        assert!(list_products(&shelf.store, &filter).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn relations_cost_two_fetches_regardless_of_size() {
        let store = InMemoryCatalogStore::new();
        let books = Category::new(CategoryId::new(), "Books").unwrap();
        let fiction = Tag::new(TagId::new(), "Fiction").unwrap();
        store.insert_category(books.clone()).unwrap();
        store.insert_tag(fiction.clone()).unwrap();
        for n in 0..50 {
            let product = Product::new(ProductId::new(), format!("Book {n}"), "", books.id_typed()).unwrap();
            store.insert_product(product, &[fiction.id_typed()]).unwrap();
        }

        let counting = CountingStore::new(store);
        let details = list_products(&counting, &ProductFilter::new()).await.unwrap();

        assert_eq!(details.len(), 50);
        assert!(details.iter().all(|d| d.tags.len() == 1));
        assert_eq!(counting.fetches(), (1, 1));
    }

    #[tokio::test]
    async fn empty_result_skips_the_tag_fetch() {
        let counting = CountingStore::new(shelf().store);
        let filter = ProductFilter::new().with_category("Garden");
        assert!(list_products(&counting, &filter).await.unwrap().is_empty());
        assert_eq!(counting.fetches(), (1, 0));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        const CATEGORIES: [&str; 3] = ["Books", "Music", "Film"];
        const TAGS: [&str; 4] = ["Fiction", "NonFiction", "Classic", "New"];
        const WORDS: [&str; 4] = ["desert", "Ocean", "space", "forest"];

        #[derive(Debug, Clone)]
        struct Shape {
            category: usize,
            tags: Vec<usize>,
            word: usize,
        }

        fn shape() -> impl Strategy<Value = Shape> {
            (0..CATEGORIES.len(), proptest::collection::vec(0..TAGS.len(), 0..4), 0..WORDS.len())
                .prop_map(|(category, tags, word)| Shape { category, tags, word })
        }

        fn build(shapes: &[Shape]) -> InMemoryCatalogStore {
            let store = InMemoryCatalogStore::new();
            let categories: Vec<Category> = CATEGORIES
                .iter()
                .map(|n| Category::new(CategoryId::new(), *n).unwrap())
                .collect();
            let tags: Vec<Tag> = TAGS.iter().map(|n| Tag::new(TagId::new(), *n).unwrap()).collect();
            for c in &categories {
                store.insert_category(c.clone()).unwrap();
            }
            for t in &tags {
                store.insert_tag(t.clone()).unwrap();
            }
            for (n, s) in shapes.iter().enumerate() {
                let product = Product::new(
                    ProductId::new(),
                    format!("P{n}"),
                    format!("A story about the {}", WORDS[s.word]),
                    categories[s.category].id_typed(),
                )
                .unwrap();
                let tag_ids: Vec<TagId> = s.tags.iter().map(|i| tags[*i].id_typed()).collect();
                store.insert_product(product, &tag_ids).unwrap();
            }
            store
        }

        proptest! {
            #![proptest_config(ProptestConfig { cases: 64, ..ProptestConfig::default() })]

            /// Property: results are exactly the matching products, each once.
            #[test]
            fn listing_is_exact_and_duplicate_free(
                shapes in proptest::collection::vec(shape(), 0..20),
                category in proptest::option::of(0..CATEGORIES.len()),
                wanted_tags in proptest::collection::vec(0..TAGS.len(), 0..3),
                word in proptest::option::of(0..WORDS.len()),
            ) {
                let store = build(&shapes);
                let mut filter = ProductFilter::new();
                if let Some(c) = category {
                    filter = filter.with_category(CATEGORIES[c]);
                }
                for t in &wanted_tags {
                    filter = filter.with_tag(TAGS[*t]);
                }
                if let Some(w) = word {
                    filter = filter.with_description(WORDS[w].to_uppercase());
                }

                let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
                let details = runtime.block_on(list_products(&store, &filter)).unwrap();

                let expected = shapes
                    .iter()
                    .filter(|s| category.is_none_or(|c| c == s.category))
                    .filter(|s| wanted_tags.is_empty() || s.tags.iter().any(|t| wanted_tags.contains(t)))
                    .filter(|s| word.is_none_or(|w| w == s.word))
                    .count();
                prop_assert_eq!(details.len(), expected);

                let mut seen = HashSet::new();
                for d in &details {
                    prop_assert!(seen.insert(d.product.id_typed()));
                    prop_assert!(filter.matches(d.category.name(), d.tag_names(), d.product.description()));
                }
            }
        }
    }
}
