mod allocator;
mod cache;
mod order;
mod ticket;
mod write_lock;

#[rustfmt::skip]
pub use {
    allocator::TicketAllocationServiceImpl,
    cache::SnapshotCache,
    order::OrderServiceImpl,
    ticket::TicketServiceImpl,
    write_lock::WriteLock,
};
