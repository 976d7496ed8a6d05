pub mod catalog;
pub mod reservation;
pub mod table;

pub use catalog::{find_book, load_catalog, read_catalog, Book};
pub use reservation::{
    append_reservation, load_reservations, reserve, reserve_at, Reservation, ReservationError,
};
pub use table::{read_table, write_table, Table, TableError, TableFormat};
