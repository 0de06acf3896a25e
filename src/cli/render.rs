//! Terminal rendering

use std::io::{self, Write};

use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};

use kampus_beken::prelude::*;

pub(crate) fn write_products(
    out: &mut impl Write,
    products: &[&Product],
    seller_name: impl Fn(&str) -> String,
) -> io::Result<()> {
    if products.is_empty() {
        return writeln!(out, "No products found.");
    }

    let mut builder = Builder::default();

    builder.push_record([
        "#", "Name", "Price", "Campus", "Category", "Condition", "Seller", "Badges",
    ]);

    for product in products {
        builder.push_record([
            product.id.to_string(),
            product.name.clone(),
            format_rupiah(product.price),
            product.campus.to_string(),
            product.category.clone(),
            product.condition.clone(),
            seller_name(&product.seller),
            badge_labels(product),
        ]);
    }

    write_table(out, builder, 2..3)?;

    writeln!(out, "{} product(s)", products.len())
}

pub(crate) fn write_cart(out: &mut impl Write, cart: &CartLedger) -> io::Result<()> {
    if cart.is_empty() {
        return writeln!(out, "Your cart is empty.");
    }

    write_lines(out, cart.lines())?;

    writeln!(out, " Items:    {}", cart.item_count())?;
    writeln!(out, " Subtotal: {}", format_rupiah(cart.subtotal()))
}

pub(crate) fn write_receipt(out: &mut impl Write, receipt: &Receipt) -> io::Result<()> {
    if receipt.lines().is_empty() {
        writeln!(out, "Your cart was empty, nothing to pay.")?;
    } else {
        write_lines(out, receipt.lines())?;
    }

    writeln!(out, " Items: {}", receipt.item_count())?;
    writeln!(out, " \x1b[1mTotal: {}\x1b[0m", format_rupiah(receipt.total()))?;
    writeln!(out, "Thank you for shopping!")
}

pub(crate) fn write_user(out: &mut impl Write, user: &User) -> io::Result<()> {
    writeln!(out, "{} <{}>", user.username, user.email)?;

    if !user.phone.is_empty() {
        writeln!(out, "Phone:  {}", user.phone)?;
    }

    writeln!(out, "Campus: {}", user.campus)
}

fn write_lines(out: &mut impl Write, lines: &[CartLine]) -> io::Result<()> {
    let mut builder = Builder::default();

    builder.push_record(["#", "Name", "Price", "Qty", "Total"]);

    for line in lines {
        builder.push_record([
            line.product_id().to_string(),
            line.product.name.clone(),
            format_rupiah(line.product.price),
            line.quantity.to_string(),
            format_rupiah(line.line_total()),
        ]);
    }

    write_table(out, builder, 2..5)
}

fn write_table(
    out: &mut impl Write,
    builder: Builder,
    numeric: std::ops::Range<usize>,
) -> io::Result<()> {
    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(numeric), Alignment::right());

    writeln!(out, "\n{table}")
}

fn badge_labels(product: &Product) -> String {
    product
        .badges
        .iter()
        .map(|badge| match badge {
            Badge::Diskon => "diskon",
            Badge::Terfavorit => "terfavorit",
        })
        .collect::<Vec<_>>()
        .join(", ")
}
