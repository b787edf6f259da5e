//! Allocator handles backed by pluggable memory resources.

use std::alloc::Layout;
use std::fmt;
use std::ptr::NonNull;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A memory resource could not satisfy a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("memory resource could not allocate {size} bytes aligned to {align}")]
pub struct AllocError {
    pub size: usize,
    pub align: usize,
}

impl AllocError {
    pub fn from_layout(layout: Layout) -> Self {
        Self {
            size: layout.size(),
            align: layout.align(),
        }
    }

    /// The layout that failed, for `std::alloc::handle_alloc_error`.
    pub fn layout(&self) -> Layout {
        Layout::from_size_align(self.size, self.align).unwrap_or(Layout::new::<u8>())
    }
}

/// A source of raw memory.
///
/// Implementations must return blocks that satisfy the requested layout and
/// accept those blocks back through [`deallocate`](MemoryResource::deallocate).
pub trait MemoryResource: Send + Sync {
    /// Allocate a block for `layout`. Zero-sized layouts yield a dangling,
    /// well-aligned pointer.
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError>;

    /// Return a block to the resource.
    ///
    /// # Safety
    ///
    /// `ptr` must come from `allocate` on this resource with the same `layout`,
    /// and must not be used afterwards.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);

    /// Short name used in debug output.
    fn name(&self) -> &str {
        "memory resource"
    }
}

fn dangling_for(layout: Layout) -> NonNull<u8> {
    // Alignment is a non-zero power of two.
    NonNull::new(std::ptr::without_provenance_mut(layout.align())).unwrap_or(NonNull::dangling())
}

// ============================================================================
// Global resource
// ============================================================================

/// Memory resource backed by the process-wide global allocator.
#[derive(Debug, Default, Clone, Copy)]
pub struct GlobalResource;

impl MemoryResource for GlobalResource {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        if layout.size() == 0 {
            return Ok(dangling_for(layout));
        }
        // SAFETY: layout has a non-zero size.
        let ptr = unsafe { std::alloc::alloc(layout) };
        NonNull::new(ptr).ok_or(AllocError::from_layout(layout))
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        if layout.size() != 0 {
            // SAFETY: caller guarantees ptr came from `allocate` with this layout.
            unsafe { std::alloc::dealloc(ptr.as_ptr(), layout) };
        }
    }

    fn name(&self) -> &str {
        "global"
    }
}

// ============================================================================
// Tracking resource
// ============================================================================

/// Global-heap resource that counts its traffic.
///
/// Useful to check which allocator a container actually used.
#[derive(Debug, Default)]
pub struct TrackingResource {
    live_bytes: AtomicUsize,
    allocations: AtomicUsize,
    deallocations: AtomicUsize,
}

impl TrackingResource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes currently allocated and not yet returned.
    pub fn live_bytes(&self) -> usize {
        self.live_bytes.load(Ordering::Relaxed)
    }

    /// Total number of successful allocations.
    pub fn allocations(&self) -> usize {
        self.allocations.load(Ordering::Relaxed)
    }

    /// Total number of deallocations.
    pub fn deallocations(&self) -> usize {
        self.deallocations.load(Ordering::Relaxed)
    }
}

impl MemoryResource for TrackingResource {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        let ptr = GlobalResource.allocate(layout)?;
        self.live_bytes.fetch_add(layout.size(), Ordering::Relaxed);
        self.allocations.fetch_add(1, Ordering::Relaxed);
        Ok(ptr)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: forwarded caller contract.
        unsafe { GlobalResource.deallocate(ptr, layout) };
        self.live_bytes.fetch_sub(layout.size(), Ordering::Relaxed);
        self.deallocations.fetch_add(1, Ordering::Relaxed);
    }

    fn name(&self) -> &str {
        "tracking"
    }
}

// ============================================================================
// Allocator handle
// ============================================================================

/// Cheap, clonable handle to a [`MemoryResource`].
///
/// The default handle uses the global heap without any reference counting.
#[derive(Clone, Default)]
pub struct Allocator {
    resource: Option<Arc<dyn MemoryResource>>,
}

impl Allocator {
    /// Create a handle that allocates from `resource`.
    pub fn new(resource: Arc<dyn MemoryResource>) -> Self {
        Self {
            resource: Some(resource),
        }
    }

    /// The global-heap handle.
    pub fn global() -> Self {
        Self::default()
    }

    fn resource(&self) -> &dyn MemoryResource {
        match &self.resource {
            Some(resource) => resource.as_ref(),
            None => &GlobalResource,
        }
    }

    /// Allocate `size` bytes aligned to `align`.
    ///
    /// `align` must be a power of two.
    pub fn allocate(&self, size: usize, align: usize) -> Result<NonNull<u8>, AllocError> {
        let layout = Layout::from_size_align(size, align);
        let layout = layout.map_err(|_| AllocError { size, align })?;
        self.resource().allocate(layout)
    }

    /// Return a block obtained from [`allocate`](Self::allocate).
    ///
    /// # Safety
    ///
    /// `ptr` must come from `allocate` on a handle to the same resource with
    /// the same `size` and `align`.
    pub unsafe fn deallocate(&self, ptr: NonNull<u8>, size: usize, align: usize) {
        // SAFETY: the caller passes the arguments that produced `ptr`.
        unsafe {
            let layout = Layout::from_size_align_unchecked(size, align);
            self.resource().deallocate(ptr, layout);
        }
    }

    /// Allocate uninitialized storage for `count` values of `T`.
    pub fn allocate_array<T>(&self, count: usize) -> Result<NonNull<T>, AllocError> {
        let overflow = AllocError {
            size: usize::MAX,
            align: align_of::<T>(),
        };
        let layout = Layout::array::<T>(count).map_err(|_| overflow)?;
        self.resource().allocate(layout).map(NonNull::cast)
    }

    /// Return storage obtained from [`allocate_array`](Self::allocate_array).
    ///
    /// # Safety
    ///
    /// `ptr` must come from `allocate_array::<T>(count)` on a handle to the
    /// same resource.
    pub unsafe fn deallocate_array<T>(&self, ptr: NonNull<T>, count: usize) {
        // SAFETY: the layout was valid when the block was allocated.
        unsafe {
            let size = size_of::<T>() * count;
            let layout = Layout::from_size_align_unchecked(size, align_of::<T>());
            self.resource().deallocate(ptr.cast(), layout);
        }
    }

    /// Returns `true` if both handles draw from the same resource.
    pub fn same_resource(&self, other: &Allocator) -> bool {
        match (&self.resource, &other.resource) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Allocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Allocator")
            .field("resource", &self.resource().name())
            .finish()
    }
}

static_assertions::assert_impl_all!(Allocator: Send, Sync, Clone);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_handles_share_the_global_resource() {
        assert!(Allocator::default().same_resource(&Allocator::global()));
    }

    #[test]
    fn custom_resource_identity() {
        let tracking: Arc<dyn MemoryResource> = Arc::new(TrackingResource::new());
        let a = Allocator::new(tracking.clone());
        let b = a.clone();
        let c = Allocator::new(Arc::new(TrackingResource::new()));
        assert!(a.same_resource(&b));
        assert!(!a.same_resource(&c));
        assert!(!a.same_resource(&Allocator::global()));
    }

    #[test]
    fn tracking_counts_traffic() {
        let tracking = Arc::new(TrackingResource::new());
        let alloc = Allocator::new(tracking.clone());

        let ptr = alloc.allocate_array::<u32>(16).unwrap();
        assert_eq!(tracking.live_bytes(), 64);
        assert_eq!(tracking.allocations(), 1);

        unsafe { alloc.deallocate_array(ptr, 16) };
        assert_eq!(tracking.live_bytes(), 0);
        assert_eq!(tracking.deallocations(), 1);
    }

    #[test]
    fn allocation_is_aligned() {
        let alloc = Allocator::global();
        let ptr = alloc.allocate(100, 64).unwrap();
        assert_eq!(ptr.as_ptr() as usize % 64, 0);
        unsafe { alloc.deallocate(ptr, 100, 64) };
    }

    #[test]
    fn zero_sized_allocation_is_dangling_and_aligned() {
        let alloc = Allocator::global();
        let ptr = alloc.allocate(0, 16).unwrap();
        assert_eq!(ptr.as_ptr() as usize % 16, 0);
        unsafe { alloc.deallocate(ptr, 0, 16) };
    }

    #[test]
    fn invalid_alignment_is_an_error() {
        let err = Allocator::global().allocate(8, 3).unwrap_err();
        assert_eq!(err, AllocError { size: 8, align: 3 });
        assert!(err.to_string().contains("aligned to 3"));
    }

    #[test]
    fn debug_names_resource() {
        let alloc = Allocator::new(Arc::new(TrackingResource::new()));
        assert!(format!("{alloc:?}").contains("tracking"));
    }
}
