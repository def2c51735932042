mod allocation;
mod order;
mod ticket;

#[rustfmt::skip]
pub use {
    allocation::TicketAllocationService,
    order::OrderService,
    ticket::TicketService,
};
