//! The cart store: sole owner and mutator of the cart.

use std::fmt;
use std::num::NonZeroU32;
use std::sync::Arc;

use super::{Cart, CartAction, CartChange, CartError};
use crate::catalog::Catalog;
use crate::types::ProductId;

/// Callback run after every successful cart operation.
///
/// Receives the change that triggered it and the cart as it stands after the
/// change.
pub type Observer = Box<dyn FnMut(&CartChange, &Cart)>;

/// Owns the [`Cart`] and funnels every change through four operations.
///
/// Observers registered with [`CartStore::subscribe`] run synchronously, in
/// registration order, before the mutating call returns.
pub struct CartStore {
    catalog: Arc<Catalog>,
    cart: Cart,
    observers: Vec<Observer>,
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("cart", &self.cart)
            .field("catalog_len", &self.catalog.len())
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl CartStore {
    /// Create an empty store that admits only products from `catalog`.
    #[must_use]
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            cart: Cart::default(),
            observers: Vec::new(),
        }
    }

    #[must_use]
    pub const fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Read-only view of the current cart.
    #[must_use]
    pub const fn snapshot(&self) -> &Cart {
        &self.cart
    }

    /// Register a callback to run after each operation.
    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: FnMut(&CartChange, &Cart) + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    /// Put a product in the cart with quantity 1.
    ///
    /// Adding a product that is already in the cart leaves its quantity
    /// unchanged. Observers are notified either way.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::UnknownProduct`] if the catalog has no such product.
    pub fn add(&mut self, product_id: ProductId) -> Result<(), CartError> {
        if !self.catalog.contains(product_id) {
            return Err(CartError::UnknownProduct(product_id));
        }
        self.cart.insert(product_id);
        self.notify(product_id, CartAction::Add);
        Ok(())
    }

    /// Raise a product's quantity by one.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotInCart`] if the product is not in the cart.
    pub fn increment(&mut self, product_id: ProductId) -> Result<(), CartError> {
        let entry = self
            .cart
            .entry_mut(product_id)
            .ok_or(CartError::NotInCart(product_id))?;
        entry.quantity = entry.quantity.saturating_add(1);
        self.notify(product_id, CartAction::Increment);
        Ok(())
    }

    /// Lower a product's quantity by one, removing it when it reaches zero.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotInCart`] if the product is not in the cart.
    pub fn decrement(&mut self, product_id: ProductId) -> Result<(), CartError> {
        let entry = self
            .cart
            .entry_mut(product_id)
            .ok_or(CartError::NotInCart(product_id))?;
        match NonZeroU32::new(entry.quantity.get() - 1) {
            Some(quantity) => entry.quantity = quantity,
            None => {
                self.cart.remove(product_id);
            }
        }
        self.notify(product_id, CartAction::Decrement);
        Ok(())
    }

    /// Remove a product from the cart. Absent products are a no-op.
    pub fn delete(&mut self, product_id: ProductId) {
        self.cart.remove(product_id);
        self.notify(product_id, CartAction::Delete);
    }

    /// Run the operation named by `action`.
    ///
    /// # Errors
    ///
    /// Propagates the error of the underlying operation.
    pub fn apply(&mut self, action: CartAction, product_id: ProductId) -> Result<(), CartError> {
        match action {
            CartAction::Add => self.add(product_id),
            CartAction::Increment => self.increment(product_id),
            CartAction::Decrement => self.decrement(product_id),
            CartAction::Delete => {
                self.delete(product_id);
                Ok(())
            }
        }
    }

    fn notify(&mut self, product_id: ProductId, action: CartAction) {
        let change = CartChange { product_id, action };
        for observer in &mut self.observers {
            observer(&change, &self.cart);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    use rust_decimal::Decimal;

    use super::*;
    use crate::catalog::fixtures::product;

    fn single_product_store() -> CartStore {
        let catalog = Catalog::new(vec![product(1, "A", Decimal::from(10))]);
        CartStore::new(Arc::new(catalog))
    }

    fn qty(store: &CartStore, id: i32) -> Option<u32> {
        store
            .snapshot()
            .quantity(ProductId::new(id))
            .map(NonZeroU32::get)
    }

    fn totals(store: &CartStore) -> (u64, Decimal) {
        let cart = store.snapshot();
        (cart.total_quantity(), cart.total_price(store.catalog()))
    }

    #[test]
    fn test_add_increment_decrement_walkthrough() {
        let mut store = single_product_store();
        let id = ProductId::new(1);

        store.add(id).unwrap();
        assert_eq!(qty(&store, 1), Some(1));
        assert_eq!(totals(&store), (1, Decimal::from(10)));

        store.increment(id).unwrap();
        assert_eq!(qty(&store, 1), Some(2));
        assert_eq!(totals(&store), (2, Decimal::from(20)));

        store.decrement(id).unwrap();
        assert_eq!(qty(&store, 1), Some(1));
        assert_eq!(totals(&store), (1, Decimal::from(10)));

        store.decrement(id).unwrap();
        assert_eq!(qty(&store, 1), None);
        assert!(store.snapshot().is_empty());
        assert_eq!(totals(&store), (0, Decimal::ZERO));
    }

    #[test]
    fn test_delete_on_empty_cart_is_noop() {
        let mut store = single_product_store();
        store.delete(ProductId::new(1));
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn test_delete_removes_regardless_of_quantity() {
        let mut store = single_product_store();
        let id = ProductId::new(1);
        store.add(id).unwrap();
        store.increment(id).unwrap();
        store.increment(id).unwrap();

        store.delete(id);
        assert!(!store.snapshot().contains(id));
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut store = single_product_store();
        store.add(ProductId::new(1)).unwrap();
        let once = store.snapshot().clone();

        store.add(ProductId::new(1)).unwrap();
        assert_eq!(store.snapshot(), &once);
        assert_eq!(qty(&store, 1), Some(1));
    }

    #[test]
    fn test_increment_saturates_at_max_quantity() {
        let mut store = single_product_store();
        let id = ProductId::new(1);
        store.add(id).unwrap();
        store.cart.entry_mut(id).unwrap().quantity = NonZeroU32::new(u32::MAX - 1).unwrap();

        store.increment(id).unwrap();
        assert_eq!(qty(&store, 1), Some(u32::MAX));

        store.increment(id).unwrap();
        assert_eq!(qty(&store, 1), Some(u32::MAX));
        assert_eq!(
            totals(&store),
            (u64::from(u32::MAX), Decimal::from(u32::MAX) * Decimal::from(10))
        );

        store.decrement(id).unwrap();
        assert_eq!(qty(&store, 1), Some(u32::MAX - 1));
    }

    #[test]
    fn test_huge_price_does_not_panic_observers() {
        let catalog = Catalog::new(vec![product(1, "A", Decimal::MAX)]);
        let mut store = CartStore::new(Arc::new(catalog));
        let seen: Rc<RefCell<Vec<Decimal>>> = Rc::default();
        {
            let seen = Rc::clone(&seen);
            let catalog = Arc::clone(store.catalog());
            store.subscribe(move |_, cart| seen.borrow_mut().push(cart.total_price(&catalog)));
        }

        let id = ProductId::new(1);
        store.add(id).unwrap();
        store.increment(id).unwrap();
        store.increment(id).unwrap();

        assert_eq!(*seen.borrow(), vec![Decimal::MAX; 3]);
    }

    #[test]
    fn test_increment_and_decrement_require_entry() {
        let mut store = single_product_store();
        let id = ProductId::new(1);

        assert_eq!(store.increment(id), Err(CartError::NotInCart(id)));
        assert_eq!(store.decrement(id), Err(CartError::NotInCart(id)));
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn test_add_rejects_products_outside_catalog() {
        let mut store = single_product_store();
        let stranger = ProductId::new(99);

        assert_eq!(store.add(stranger), Err(CartError::UnknownProduct(stranger)));
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn test_observers_see_post_mutation_state_in_order() {
        let mut store = single_product_store();
        let log: Rc<RefCell<Vec<String>>> = Rc::default();

        for name in ["first", "second"] {
            let log = Rc::clone(&log);
            store.subscribe(move |change, cart| {
                let quantity = cart.quantity(change.product_id).map_or(0, NonZeroU32::get);
                log.borrow_mut()
                    .push(format!("{name}:{}:{quantity}", change.action));
            });
        }

        let id = ProductId::new(1);
        store.add(id).unwrap();
        store.increment(id).unwrap();
        store.decrement(id).unwrap();
        store.decrement(id).unwrap();

        assert_eq!(
            *log.borrow(),
            vec![
                "first:add:1",
                "second:add:1",
                "first:increment:2",
                "second:increment:2",
                "first:decrement:1",
                "second:decrement:1",
                "first:decrement:0",
                "second:decrement:0",
            ]
        );
    }

    #[test]
    fn test_failed_operations_do_not_notify() {
        let mut store = single_product_store();
        let calls = Rc::new(RefCell::new(0));
        {
            let calls = Rc::clone(&calls);
            store.subscribe(move |_, _| *calls.borrow_mut() += 1);
        }

        let _ = store.increment(ProductId::new(1));
        let _ = store.add(ProductId::new(42));
        assert_eq!(*calls.borrow(), 0);

        store.add(ProductId::new(1)).unwrap();
        store.add(ProductId::new(1)).unwrap();
        store.delete(ProductId::new(1));
        assert_eq!(*calls.borrow(), 3);
    }

    /// Every sequence of operations over two products agrees with a plain
    /// map model: quantities stay positive and totals match the catalog.
    #[test]
    fn test_exhaustive_sequences_match_model() {
        let catalog = Arc::new(Catalog::new(vec![
            product(1, "Waffle", Decimal::new(65, 1)),
            product(2, "Brownie", Decimal::new(45, 1)),
        ]));
        let actions = [
            CartAction::Add,
            CartAction::Increment,
            CartAction::Decrement,
            CartAction::Delete,
        ];
        let steps: Vec<(CartAction, ProductId)> = actions
            .iter()
            .flat_map(|&a| [(a, ProductId::new(1)), (a, ProductId::new(2))])
            .collect();
        let depth = 5;
        let combos = steps.len().pow(depth);

        for mut code in 0..combos {
            let mut store = CartStore::new(Arc::clone(&catalog));
            let mut model: HashMap<ProductId, u32> = HashMap::new();

            for _ in 0..depth {
                let (action, id) = steps[code % steps.len()];
                code /= steps.len();

                let result = store.apply(action, id);
                match action {
                    CartAction::Add => {
                        model.entry(id).or_insert(1);
                        assert!(result.is_ok());
                    }
                    CartAction::Delete => {
                        model.remove(&id);
                        assert!(result.is_ok());
                    }
                    CartAction::Increment | CartAction::Decrement => {
                        let Some(q) = model.get(&id).copied() else {
                            assert_eq!(result, Err(CartError::NotInCart(id)));
                            continue;
                        };
                        assert!(result.is_ok());
                        let next = if action == CartAction::Increment { q + 1 } else { q - 1 };
                        if next == 0 {
                            model.remove(&id);
                        } else {
                            model.insert(id, next);
                        }
                    }
                }

                let cart = store.snapshot();
                assert_eq!(cart.len(), model.len());
                for (id, q) in &model {
                    assert_eq!(cart.quantity(*id).map(NonZeroU32::get), Some(*q));
                }
                let expected: Decimal = model
                    .iter()
                    .map(|(id, q)| catalog.get(*id).unwrap().price * Decimal::from(*q))
                    .sum();
                assert_eq!(cart.total_price(&catalog), expected);
            }
        }
    }
}
