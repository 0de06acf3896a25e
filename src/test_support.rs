//! Shared builders for unit tests.

use smallvec::SmallVec;

use crate::{
    campus::Campus,
    products::{Product, ProductId},
    users::User,
};

pub(crate) fn product(id: u64, seller: &str, price: u64) -> Product {
    Product {
        id: ProductId::new(id),
        name: format!("Barang {id}"),
        price,
        campus: Campus::Ui,
        category: "lainnya".to_string(),
        condition: "Bagus".to_string(),
        seller: seller.to_string(),
        image: format!("barang-{id}.jpg"),
        badges: SmallVec::new(),
    }
}

pub(crate) fn user(email: &str, phone: &str, campus: Campus, username: &str) -> User {
    User {
        email: email.to_string(),
        phone: phone.to_string(),
        campus,
        username: username.to_string(),
    }
}
