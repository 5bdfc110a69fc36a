//! Open-addressed hash table keyed on strings, used as the vocabulary store
//! for the inverted index and the Zipf histogram.
//!
//! Double hashing: djb2 picks the home slot, a 37-polynomial hash picks the
//! probe stride. Capacities are powers of two and the stride is forced odd,
//! so every probe sequence visits the whole table. Grows at load factor 0.5.

const INITIAL_CAPACITY: usize = 16384;

struct Slot<V> {
    key: Box<str>,
    value: V,
    // Reserved for a future delete operation; nothing sets it today.
    // Lookups skip deleted entries, insertion may reuse their slots.
    deleted: bool,
}

pub struct StringMap<V> {
    slots: Vec<Option<Slot<V>>>,
    len: usize,
}

fn hash1(key: &[u8]) -> u64 {
    let mut h: u64 = 5381;
    for &b in key {
        h = h.wrapping_mul(33).wrapping_add(b as u64);
    }
    h
}

fn hash2(key: &[u8]) -> u64 {
    let mut h: u64 = 0;
    for &b in key {
        h = h.wrapping_mul(37).wrapping_add(b as u64);
    }
    h
}

impl<V> Default for StringMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> StringMap<V> {
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_CAPACITY)
    }

    /// `capacity` is rounded up to a power of two, minimum 16.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.next_power_of_two().max(16);
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        StringMap { slots, len: 0 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn stride(&self, key: &[u8]) -> usize {
        let cap = self.slots.len() as u64;
        // The +1 keeps the stride non-zero; the |1 keeps it odd, coprime to
        // the power-of-two capacity.
        (((hash2(key) % (cap - 1)) + 1) | 1) as usize
    }

    /// Slot where `key` lives, or the first reusable slot on its probe path.
    /// The second field is true when the key is already present.
    fn locate_insert(&self, key: &str) -> (usize, bool) {
        let cap = self.slots.len();
        let mut idx = (hash1(key.as_bytes()) % cap as u64) as usize;
        let step = self.stride(key.as_bytes());
        for _ in 0..cap {
            match &self.slots[idx] {
                None => return (idx, false),
                Some(slot) if slot.deleted => return (idx, false),
                Some(slot) if &*slot.key == key => return (idx, true),
                Some(_) => idx = (idx + step) % cap,
            }
        }
        // Unreachable while the load factor stays below 1; the growth check
        // in insert() guarantees that.
        (idx, false)
    }

    /// Index of the live slot holding `key`, skipping tombstones.
    fn lookup_index(&self, key: &str) -> Option<usize> {
        let cap = self.slots.len();
        let mut idx = (hash1(key.as_bytes()) % cap as u64) as usize;
        let step = self.stride(key.as_bytes());
        for _ in 0..cap {
            match &self.slots[idx] {
                None => return None,
                Some(slot) if !slot.deleted && &*slot.key == key => return Some(idx),
                Some(_) => idx = (idx + step) % cap,
            }
        }
        None
    }

    fn should_grow(&self) -> bool {
        // (len + 1) / capacity > 0.5, in integers.
        (self.len + 1) * 2 > self.slots.len()
    }

    fn grow(&mut self) {
        let doubled = self.slots.len() * 2;
        let mut replacement = Vec::with_capacity(doubled);
        replacement.resize_with(doubled, || None);
        let old = std::mem::replace(&mut self.slots, replacement);
        self.len = 0;
        for slot in old.into_iter().flatten() {
            if !slot.deleted {
                self.insert_owned(slot.key, slot.value);
            }
        }
    }

    fn insert_owned(&mut self, key: Box<str>, value: V) {
        let (idx, existing) = self.locate_insert(&key);
        match &mut self.slots[idx] {
            Some(slot) if existing => slot.value = value,
            slot => {
                *slot = Some(Slot {
                    key,
                    value,
                    deleted: false,
                });
                self.len += 1;
            }
        }
    }

    /// Insert or replace. The key is copied into the map.
    pub fn insert(&mut self, key: &str, value: V) {
        if self.should_grow() {
            self.grow();
        }
        self.insert_owned(Box::from(key), value);
    }

    pub fn find(&self, key: &str) -> Option<&V> {
        let idx = self.lookup_index(key)?;
        self.slots[idx].as_ref().map(|slot| &slot.value)
    }

    pub fn find_mut(&mut self, key: &str) -> Option<&mut V> {
        let idx = self.lookup_index(key)?;
        self.slots[idx].as_mut().map(|slot| &mut slot.value)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lookup_index(key).is_some()
    }

    /// Mutable reference to the value for `key`, default-constructing it on
    /// first sight. The reference stays valid until the next insert.
    pub fn get_or_create(&mut self, key: &str) -> &mut V
    where
        V: Default,
    {
        if self.should_grow() {
            self.grow();
        }
        let (idx, existing) = self.locate_insert(key);
        if !existing {
            self.slots[idx] = Some(Slot {
                key: Box::from(key),
                value: V::default(),
                deleted: false,
            });
            self.len += 1;
        }
        match &mut self.slots[idx] {
            Some(slot) => &mut slot.value,
            None => unreachable!("slot filled on the line above"),
        }
    }

    /// Visit every live entry. Iteration order is the bucket order and only
    /// observable through this callback; borrowed pairs may outlive the call.
    pub fn for_each<'a, F>(&'a self, mut f: F)
    where
        F: FnMut(&'a str, &'a V),
    {
        for slot in self.slots.iter().flatten() {
            if !slot.deleted {
                f(&slot.key, &slot.value);
            }
        }
    }
}
