//! Invoice derivation walkthrough

use gst_invoice_core::{
    derive_invoice_with,
    utils::{format_currency, MemoryStorage},
    GstCategory, InvoiceConfig,
    InvoiceHeader, InvoiceRegister, Party, RawInvoice, RawLineItem,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🧾 GST Invoice Core - Invoice Walkthrough\n");

    let config = InvoiceConfig::from_env()?;
    let symbol = config.currency_symbol.clone();

    // 1. Rate presets offered on the invoice form
    println!("📊 Standard GST slabs:");
    for category in [
        GstCategory::Essential,
        GstCategory::Reduced,
        GstCategory::Standard,
        GstCategory::Higher,
        GstCategory::Luxury,
    ] {
        let intra = category.intra_state_rates();
        println!(
            "  {:?}: {}% (CGST {}% + SGST {}%, or IGST {}%)",
            category,
            category.rate(),
            intra.cgst_rate,
            intra.sgst_rate,
            category.rate()
        );
    }
    println!();

    // 2. A railway advertising invoice as the admin form would submit it
    let header = InvoiceHeader {
        invoice_number: "ADV/24-25/017".to_string(),
        invoice_date: "2024-05-02".to_string(),
        period_from: Some("2024-04-01".to_string()),
        period_to: Some("2024-04-30".to_string()),
        seller: Party {
            name: "Metro Outdoor Media".to_string(),
            gstin: "27AAPFU0939F1ZV".to_string(),
            pan: "AAPFU0939F".to_string(),
            state_name: "Maharashtra".to_string(),
            state_code: "27".to_string(),
            ..Default::default()
        },
        buyer: Party {
            name: "Central Railway".to_string(),
            state_name: "Maharashtra".to_string(),
            state_code: "27".to_string(),
            ..Default::default()
        },
        ..Default::default()
    };
    let raw = RawInvoice::new(
        header,
        vec![
            RawLineItem::new("Platform hoarding, CSMT", "998363", "45000", "9", "9", "0"),
            RawLineItem::new("Foot overbridge panels", "998363", 12500.5, 9, 9, 0),
            RawLineItem::new("Train wrap, Pune route", "998365", "30000", "", "", "18"),
            RawLineItem::new("Printing charges", "", "abc", "9", "9", "0"),
        ],
    );

    let invoice = derive_invoice_with(&raw, &config);

    println!(
        "🧾 Invoice {} dated {}",
        invoice.header.invoice_number,
        invoice.display_date()
    );
    if let Some(period) = invoice.display_period() {
        println!("  Service period: {}", period);
    }
    println!("  Line Items:");
    for (i, item) in invoice.items.iter().enumerate() {
        println!(
            "    {}. {} [{}] {} + tax {} = {}",
            i + 1,
            item.description,
            item.hsn,
            format_currency(&item.amount, &symbol),
            format_currency(&item.total_tax(), &symbol),
            format_currency(&item.total, &symbol)
        );
    }
    println!();

    println!("  HSN Summary:");
    for entry in &invoice.tax_summary {
        println!(
            "    {:<8} taxable {}  CGST {}% {}  SGST {}% {}  IGST {}% {}{}",
            entry.hsn,
            format_currency(&entry.taxable_value, &symbol),
            entry.cgst_rate,
            format_currency(&entry.cgst_amount, &symbol),
            entry.sgst_rate,
            format_currency(&entry.sgst_amount, &symbol),
            entry.igst_rate,
            format_currency(&entry.igst_amount, &symbol),
            if entry.rate_mismatch { "  (rates differ)" } else { "" }
        );
    }
    println!();

    println!("  Invoice Summary:");
    println!("    Taxable value: {}", format_currency(&invoice.total_amount, &symbol));
    println!("    Total CGST:    {}", format_currency(&invoice.total_cgst, &symbol));
    println!("    Total SGST:    {}", format_currency(&invoice.total_sgst, &symbol));
    println!("    Total IGST:    {}", format_currency(&invoice.total_igst, &symbol));
    println!("    Total tax:     {}", format_currency(&invoice.total_tax_amount, &symbol));
    println!("    Grand Total:   {}", format_currency(&invoice.grand_total, &symbol));
    println!("    In words:      {}", invoice.grand_total_in_words);
    println!("    Tax in words:  {}", invoice.total_tax_in_words);
    println!();

    // 3. Saving through the register; figures are recomputed on every read
    println!("🗂️ Invoice register:");
    let mut register = InvoiceRegister::strict(MemoryStorage::new(), config);
    let stored = register.create_invoice(raw).await?;
    for row in register.list_invoices().await? {
        println!(
            "  {} | {} | {} | {}",
            row.invoice_number, row.invoice_date, row.buyer_name, row.grand_total_display
        );
    }
    let reloaded = register.derived_invoice(&stored.id).await?;
    assert_eq!(reloaded, invoice);

    println!("\n🎉 Invoice walkthrough completed successfully!");
    Ok(())
}
