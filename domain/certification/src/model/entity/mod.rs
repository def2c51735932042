pub mod order;
pub mod ticket;

#[rustfmt::skip]
pub use {
    order::Order,
    ticket::Ticket,
};
