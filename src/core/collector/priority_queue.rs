/// Ordering used by a [`PriorityQueue`], the least element sits on top.
pub trait HeapOrder<T> {
    fn less_than(&self, a: &T, b: &T) -> bool;
}

/// Bounded binary min-heap.
///
/// Elements are stored in a 0-based array; the children of `i` live at
/// `2i + 1` and `2i + 2`.
#[derive(Debug, Clone)]
pub struct PriorityQueue<T, O> {
    heap: Vec<T>,
    max_size: usize,
    order: O,
}

impl<T, O: HeapOrder<T>> PriorityQueue<T, O> {
    pub fn new(max_size: usize, order: O) -> Self {
        Self { heap: Vec::with_capacity(max_size), max_size, order }
    }

    /// A full queue of sentinels. Sentinels must be less than or equal to any real element,
    /// real ones then replace them through `top_mut` + `update_top`.
    pub fn with_sentinels(max_size: usize, order: O, mut sentinel: impl FnMut() -> T) -> Self {
        let mut heap = Vec::with_capacity(max_size);
        heap.extend((0..max_size).map(|_| sentinel()));
        Self { heap, max_size, order }
    }

    /// Adds an element, the caller makes sure the queue isn't full.
    pub fn add(&mut self, element: T) {
        debug_assert!(self.heap.len() < self.max_size, "priority queue overflow");
        self.heap.push(element);
        self.up_heap(self.heap.len() - 1);
    }

    /// Adds `element` if there is room or if it is not less than the top.
    /// Returns whatever fell out: the old top, `element` itself, or nothing.
    pub fn insert_with_overflow(&mut self, element: T) -> Option<T> {
        if self.heap.len() < self.max_size {
            self.add(element);
            return None;
        }
        if !self.heap.is_empty() && !self.order.less_than(&element, &self.heap[0]) {
            let evicted = std::mem::replace(&mut self.heap[0], element);
            self.down_heap(0);
            return Some(evicted);
        }
        Some(element)
    }

    pub fn top(&self) -> Option<&T> {
        self.heap.first()
    }

    /// Mutable access to the top; call `update_top` after changing it.
    pub fn top_mut(&mut self) -> Option<&mut T> {
        self.heap.first_mut()
    }

    /// Restores the heap after the top was modified in place.
    pub fn update_top(&mut self) -> Option<&T> {
        self.down_heap(0);
        self.heap.first()
    }

    pub fn pop(&mut self) -> Option<T> {
        if self.heap.is_empty() {
            return None;
        }
        let top = self.heap.swap_remove(0);
        self.down_heap(0);
        Some(top)
    }

    pub fn size(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }

    /// Heap order, not sorted.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.heap.iter()
    }

    pub fn order(&self) -> &O {
        &self.order
    }

    fn up_heap(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if !self.order.less_than(&self.heap[i], &self.heap[parent]) {
                break;
            }
            self.heap.swap(i, parent);
            i = parent;
        }
    }

    fn down_heap(&mut self, mut i: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * i + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let child = match right < len && self.order.less_than(&self.heap[right], &self.heap[left]) {
                true => right,
                false => left,
            };
            if !self.order.less_than(&self.heap[child], &self.heap[i]) {
                break;
            }
            self.heap.swap(i, child);
            i = child;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::seq::SliceRandom;

    struct MinOrder;

    impl HeapOrder<i32> for MinOrder {
        fn less_than(&self, a: &i32, b: &i32) -> bool {
            a < b
        }
    }

    #[test]
    fn test_pop_in_order() {
        let mut values: Vec<i32> = (0..100).collect();
        values.shuffle(&mut rand::thread_rng());

        let mut pq = PriorityQueue::new(100, MinOrder);
        for v in values {
            pq.add(v);
        }
        assert_eq!(pq.size(), 100);
        let popped: Vec<i32> = std::iter::from_fn(|| pq.pop()).collect();
        assert_eq!(popped, (0..100).collect::<Vec<_>>());
        assert!(pq.pop().is_none());
    }

    #[test]
    fn test_insert_with_overflow_keeps_largest() {
        let mut values: Vec<i32> = (0..50).collect();
        values.shuffle(&mut rand::thread_rng());

        let mut pq = PriorityQueue::new(5, MinOrder);
        let mut overflowed = 0;
        for v in values {
            if pq.insert_with_overflow(v).is_some() {
                overflowed += 1;
            }
        }
        assert_eq!(overflowed, 45);
        let mut kept: Vec<i32> = pq.iter().copied().collect();
        kept.sort();
        assert_eq!(kept, vec![45, 46, 47, 48, 49]);
        // a smaller element comes straight back
        assert_eq!(pq.insert_with_overflow(3), Some(3));
        assert_eq!(pq.insert_with_overflow(60), Some(45));
    }

    #[test]
    fn test_update_top_and_sentinels() {
        let mut pq = PriorityQueue::with_sentinels(3, MinOrder, || i32::MIN);
        assert_eq!(pq.size(), 3);
        for v in [7, 3, 9, 1] {
            if v > *pq.top().unwrap() {
                *pq.top_mut().unwrap() = v;
                pq.update_top();
            }
        }
        // size never changes in sentinel mode
        assert_eq!(pq.size(), 3);
        assert_eq!(pq.pop(), Some(3));
        assert_eq!(pq.pop(), Some(7));
        assert_eq!(pq.pop(), Some(9));
        pq.clear();
        assert!(pq.is_empty());
    }
}
