use sheet_types::{PartPriceInput, PriceBreakdown, PricingConfig};

/// Quote one order line. Unknown materials and thicknesses price at 1x.
pub fn calculate_part_price(input: &PartPriceInput, config: &PricingConfig) -> PriceBreakdown {
    let areaCm2 = input.area_mm2 / 100.0;
    let areaCost = areaCm2 * config.per_cm2_rate;
    let cutCost = input.cut_length_mm * config.per_mm_cut_rate;

    let materialMultiplier = config
        .material_multipliers
        .get(&input.material)
        .copied()
        .unwrap_or(1.0);
    // "2.0" and "2" name the same table row
    let thicknessMultiplier = config
        .thickness_multipliers
        .get(&input.thickness)
        .or_else(|| {
            let key = thickness_key(input.thickness.trim().parse::<f64>().ok()?);
            config.thickness_multipliers.get(&key)
        })
        .copied()
        .unwrap_or(1.0);
    let complexityMultiplier = config.complexity_multiplier;

    let subtotalPerUnit = ((areaCost + cutCost)
        * materialMultiplier
        * thicknessMultiplier
        * complexityMultiplier)
        .max(config.minimum_price);

    let bulkDiscount = if input.quantity >= config.bulk_discount_threshold {
        config.bulk_discount_percent / 100.0 * subtotalPerUnit
    } else {
        0.0
    };

    let pricePerUnit = subtotalPerUnit - bulkDiscount;
    let totalBeforeVat = pricePerUnit * f64::from(input.quantity);
    let vat = totalBeforeVat * config.vat_rate;

    PriceBreakdown {
        area_cost: areaCost,
        cut_cost: cutCost,
        material_multiplier: materialMultiplier,
        thickness_multiplier: thicknessMultiplier,
        complexity_multiplier: complexityMultiplier,
        subtotal_per_unit: subtotalPerUnit,
        bulk_discount: bulkDiscount,
        price_per_unit: pricePerUnit,
        total_before_vat: totalBeforeVat,
        vat,
        total: totalBeforeVat + vat,
    }
}

/// Thickness in mm as the multiplier table keys it ("2", "1.5").
pub fn thickness_key(thickness: f64) -> String {
    format!("{thickness}")
}

/// Gross unit price in minor currency units, as charged at checkout.
pub fn gross_unit_amount_cents(pricePerUnit: f64, vatRate: f64) -> i64 {
    (pricePerUnit * (1.0 + vatRate) * 100.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(area: f64, cut: f64, material: &str, thickness: &str, quantity: u32) -> PartPriceInput {
        PartPriceInput {
            area_mm2: area,
            cut_length_mm: cut,
            material: material.to_string(),
            thickness: thickness.to_string(),
            quantity,
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn area_and_cut_costs() {
        let config = PricingConfig::default();
        let price = calculate_part_price(&input(10_000.0, 500.0, "steel", "1", 1), &config);

        assert!(close(price.area_cost, 5.0));
        assert!(close(price.cut_cost, 5.0));
        assert!(close(price.subtotal_per_unit, 10.0));
    }

    #[test]
    fn multipliers_apply() {
        let config = PricingConfig::default();

        let stainless = calculate_part_price(&input(10_000.0, 0.0, "stainless", "1", 1), &config);
        assert!(close(stainless.subtotal_per_unit, 9.0));
        assert_eq!(stainless.material_multiplier, 1.8);

        let thick = calculate_part_price(&input(10_000.0, 0.0, "steel", "3", 1), &config);
        assert!(close(thick.subtotal_per_unit, 7.5));
        assert_eq!(thick.thickness_multiplier, 1.5);

        let spelledOut = calculate_part_price(&input(10_000.0, 0.0, "steel", "3.0", 1), &config);
        assert_eq!(spelledOut.thickness_multiplier, 1.5);
    }

    #[test]
    fn unknown_material_and_thickness_default_to_one() {
        let config = PricingConfig::default();
        let price = calculate_part_price(&input(20_000.0, 0.0, "titanium", "7", 1), &config);

        assert_eq!(price.material_multiplier, 1.0);
        assert_eq!(price.thickness_multiplier, 1.0);
        assert!(close(price.subtotal_per_unit, 10.0));
    }

    #[test]
    fn minimum_price_per_unit() {
        let config = PricingConfig::default();
        let price = calculate_part_price(&input(100.0, 10.0, "steel", "1", 2), &config);

        assert!(close(price.subtotal_per_unit, 5.0));
        assert!(close(price.total_before_vat, 10.0));
    }

    #[test]
    fn bulk_discount_at_threshold() {
        let config = PricingConfig::default();

        let below = calculate_part_price(&input(10_000.0, 500.0, "steel", "1", 9), &config);
        assert_eq!(below.bulk_discount, 0.0);

        let at = calculate_part_price(&input(10_000.0, 500.0, "steel", "1", 10), &config);
        assert!(close(at.bulk_discount, 1.0));
        assert!(close(at.price_per_unit, 9.0));
        assert!(close(at.total_before_vat, 90.0));
    }

    #[test]
    fn vat_on_total() {
        let config = PricingConfig::default();
        let price = calculate_part_price(&input(10_000.0, 500.0, "steel", "1", 2), &config);

        assert!(close(price.vat, 4.2));
        assert!(close(price.total, 24.2));
    }

    #[test]
    fn checkout_amount_in_cents() {
        assert_eq!(gross_unit_amount_cents(10.0, 0.21), 1210);
        assert_eq!(thickness_key(2.0), "2");
        assert_eq!(thickness_key(1.5), "1.5");
    }
}
