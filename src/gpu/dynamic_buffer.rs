//! Dynamic GPU buffer management with automatic resizing
//!
//! Provides a typed buffer that grows automatically when data exceeds
//! capacity, using a 2x growth strategy to minimize reallocations.

use std::marker::PhantomData;

/// Minimum capacity, in items, of a freshly created buffer.
const MIN_CAPACITY: usize = 16;

/// Capacity after a write of `needed` items into a buffer of `current`
/// items: unchanged when it fits, otherwise twice the need.
#[must_use]
pub fn grown_capacity(current: usize, needed: usize) -> usize {
    if needed <= current {
        current
    } else {
        (needed * 2).max(MIN_CAPACITY)
    }
}

/// A typed GPU buffer that can grow dynamically
///
/// Tracks item count rather than byte length. Never shrinks (GPU buffers
/// cannot be resized in place).
pub struct GrowableBuffer<T> {
    buffer: wgpu::Buffer,
    capacity: usize,
    count: usize,
    usage: wgpu::BufferUsages,
    label: String,
    _marker: PhantomData<T>,
}

impl<T: bytemuck::Pod> GrowableBuffer<T> {
    /// Buffer with room for `capacity` items.
    #[must_use]
    pub fn with_capacity(
        device: &wgpu::Device,
        label: &str,
        capacity: usize,
        usage: wgpu::BufferUsages,
    ) -> Self {
        let capacity = capacity.max(MIN_CAPACITY);
        Self {
            buffer: Self::allocate(device, label, capacity, usage),
            capacity,
            count: 0,
            usage,
            label: label.to_owned(),
            _marker: PhantomData,
        }
    }

    /// Buffer initialized from existing data.
    #[must_use]
    pub fn new_with_data(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        data: &[T],
        usage: wgpu::BufferUsages,
    ) -> Self {
        let mut buffer = Self::with_capacity(device, label, data.len(), usage);
        let _ = buffer.write(device, queue, data);
        buffer
    }

    fn allocate(
        device: &wgpu::Device,
        label: &str,
        capacity: usize,
        usage: wgpu::BufferUsages,
    ) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: (capacity * size_of::<T>()) as u64,
            usage: usage | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Write data to buffer, growing if necessary
    ///
    /// Returns `true` if buffer was reallocated (bind groups need recreation)
    pub fn write(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        data: &[T],
    ) -> bool {
        let new_capacity = grown_capacity(self.capacity, data.len());
        let reallocated = new_capacity != self.capacity;
        if reallocated {
            log::debug!(
                "{}: growing {} -> {} items",
                self.label,
                self.capacity,
                new_capacity
            );
            self.buffer =
                Self::allocate(device, &self.label, new_capacity, self.usage);
            self.capacity = new_capacity;
        }

        if !data.is_empty() {
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(data));
        }
        self.count = data.len();

        reallocated
    }

    /// The underlying wgpu buffer.
    #[must_use]
    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    /// Slice covering the written items, for `set_vertex_buffer`.
    #[must_use]
    pub fn slice(&self) -> wgpu::BufferSlice<'_> {
        self.buffer
            .slice(..(self.count * size_of::<T>()) as wgpu::BufferAddress)
    }

    /// Number of items written by the last `write`.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Whether the last write was empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Capacity in items.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fitting_writes_keep_capacity() {
        assert_eq!(grown_capacity(100, 0), 100);
        assert_eq!(grown_capacity(100, 100), 100);
    }

    #[test]
    fn overflow_doubles_the_need() {
        assert_eq!(grown_capacity(100, 101), 202);
        assert_eq!(grown_capacity(16, 1000), 2000);
        assert_eq!(grown_capacity(0, 1), MIN_CAPACITY);
    }
}
