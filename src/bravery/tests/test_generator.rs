// Tests for the random build generator

use super::test_helpers::*;
use crate::bravery::{generate, Build, Catalog};
use crate::error::Error;
use crate::lcu::PERK_PAGE_SIZE;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;

#[cfg(test)]
mod generator_tests {
    use super::*;

    fn roll(ids: &[i64], seed: u64) -> Build {
        let catalog = sample_catalog();
        let mut rng = StdRng::seed_from_u64(seed);
        generate(ids, &catalog, &mut rng).unwrap()
    }

    fn row_of(catalog: &Catalog, tree_id: i64, rune_id: i64) -> Option<usize> {
        let tree = catalog.runes.iter().find(|t| t.id == tree_id)?;
        tree.slots().iter().position(|row| row.iter().any(|r| r.id == rune_id))
    }

    /// Test: Cassiopeia never gets boots and always gets 5 legendaries
    #[test]
    fn test_cassiopeia_has_no_boots() {
        for seed in 0..50 {
            let build = roll(&[CASSIOPEIA], seed);
            assert_eq!(build.champion.name, "Cassiopeia");
            assert!(build.boots.is_none());
            assert_eq!(build.legendaries.len(), 5);
            assert_eq!(build.items().len(), 6);
        }
    }

    /// Test: Everyone else gets one boots, one mythic and 4 distinct legendaries
    #[test]
    fn test_regular_item_set() {
        let catalog = sample_catalog();
        for seed in 0..50 {
            let build = roll(&[ANNIE, GAREN, ZED], seed);
            assert_ne!(build.champion.id, CASSIOPEIA);

            let boots = build.boots.as_ref().unwrap();
            assert!(catalog.items.boots.contains(boots));
            assert!(catalog.items.mythic.contains(&build.mythic));
            assert_eq!(build.legendaries.len(), 4);

            let unique: HashSet<i64> = build.legendaries.iter().map(|l| l.id).collect();
            assert_eq!(unique.len(), 4);
            assert!(build.legendaries.iter().all(|l| !catalog.items.mythic.contains(l)));

            let items = build.items();
            assert_eq!(items.len(), 6);
            assert_eq!(items[0], boots);
            assert_eq!(items[1], &build.mythic);
        }
    }

    /// Test: Premium boots never show up as a legendary
    #[test]
    fn test_premium_boots_never_doubled() {
        let catalog = catalog_with_premium_boots();
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let build = generate(&[ANNIE, CASSIOPEIA], &catalog, &mut rng).unwrap();
            let boots_count = build
                .items()
                .iter()
                .filter(|item| catalog.items.boots.contains(item))
                .count();
            if build.champion.id == CASSIOPEIA {
                assert_eq!(boots_count, 0, "seed {}", seed);
            } else {
                assert_eq!(boots_count, 1, "seed {}", seed);
            }
        }
    }

    /// Test: Hand-built catalogs with boots in the legendary table are filtered too
    #[test]
    fn test_legendary_pool_excludes_boots() {
        let mut catalog = sample_catalog();
        let boots = catalog.items.boots[0].clone();
        catalog.items.legendary.push(boots.clone());
        catalog.items.legendary.truncate(5);
        catalog.items.legendary.push(boots);

        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..50 {
            let build = generate(&[ANNIE], &catalog, &mut rng).unwrap();
            assert!(build.legendaries.iter().all(|l| !catalog.items.boots.contains(l)));
        }
        // Only 5 real legendaries left, Cassiopeia needs 5
        assert!(generate(&[CASSIOPEIA], &catalog, &mut rng).is_ok());
        catalog.items.legendary.truncate(4);
        assert!(matches!(generate(&[CASSIOPEIA], &catalog, &mut rng), Err(Error::Catalog(_))));
    }

    /// Test: Rune page has a keystone and 3 primary runes from one tree, 2 from another
    #[test]
    fn test_rune_page_shape() {
        let catalog = sample_catalog();
        for seed in 0..50 {
            let build = roll(&[ANNIE], seed);
            assert_ne!(build.primary_style_id(), build.sub_style_id());

            let primary = catalog.runes.iter().find(|t| t.id == build.primary_style_id()).unwrap();
            assert!(primary.keystones.contains(&build.keystone));
            let primary_rows: Vec<Option<usize>> = build
                .primary_runes
                .iter()
                .map(|r| row_of(&catalog, primary.id, r.id))
                .collect();
            assert_eq!(primary_rows, vec![Some(0), Some(1), Some(2)]);

            let secondary_rows: Vec<usize> = build
                .secondary_runes
                .iter()
                .map(|r| row_of(&catalog, build.sub_style_id(), r.id).unwrap())
                .collect();
            assert_eq!(secondary_rows.len(), 2);
            assert!(secondary_rows[0] < secondary_rows[1]);

            for (slot, stat) in build.stat_mods.iter().enumerate() {
                assert!(catalog.stat_mods[slot].contains(stat));
            }
        }
    }

    /// Test: Perk ids come out in rune page order
    #[test]
    fn test_perk_ids_order() {
        let build = roll(&[ZED], 7);
        let perks = build.perk_ids();
        assert_eq!(perks.len(), PERK_PAGE_SIZE);
        assert_eq!(perks[0], build.keystone.id);
        assert_eq!(perks[1..4], build.primary_runes.iter().map(|r| r.id).collect::<Vec<_>>()[..]);
        assert_eq!(perks[4..6], build.secondary_runes.iter().map(|r| r.id).collect::<Vec<_>>()[..]);
        assert_eq!(perks[6..], build.stat_mods.iter().map(|r| r.id).collect::<Vec<_>>()[..]);
    }

    /// Test: The same seed rolls the same build
    #[test]
    fn test_seeded_rolls_repeat() {
        let ids = [ANNIE, CASSIOPEIA, GAREN, ZED];
        assert_eq!(roll(&ids, 42), roll(&ids, 42));

        let champions: HashSet<i64> = (0..40).map(|seed| roll(&ids, seed).champion.id).collect();
        assert!(champions.len() > 1);
    }

    /// Test: Every tree shows up as primary over enough rolls
    #[test]
    fn test_all_trees_reachable() {
        let primaries: HashSet<i64> = (0..200).map(|seed| roll(&[ANNIE], seed).primary_style_id()).collect();
        assert_eq!(primaries.len(), TREES.len());
    }

    /// Test: Bad inputs and thin catalogs are rejected
    #[test]
    fn test_errors() {
        let catalog = sample_catalog();
        let mut rng = StdRng::seed_from_u64(1);

        assert!(matches!(generate(&[], &catalog, &mut rng), Err(Error::Validation(_))));
        assert!(matches!(generate(&[9999], &catalog, &mut rng), Err(Error::Catalog(_))));

        let mut thin = catalog.clone();
        thin.items.legendary.truncate(4);
        assert!(generate(&[ANNIE], &thin, &mut rng).is_ok());
        assert!(matches!(generate(&[CASSIOPEIA], &thin, &mut rng), Err(Error::Catalog(_))));

        let mut one_tree = catalog.clone();
        one_tree.runes.truncate(1);
        assert!(matches!(generate(&[ANNIE], &one_tree, &mut rng), Err(Error::Catalog(_))));

        let mut short_grid = catalog.clone();
        short_grid.stat_mods.pop();
        assert!(matches!(generate(&[ANNIE], &short_grid, &mut rng), Err(Error::Catalog(_))));

        let mut no_boots = catalog;
        no_boots.items.boots.clear();
        assert!(matches!(generate(&[ANNIE], &no_boots, &mut rng), Err(Error::Catalog(_))));
        assert!(generate(&[CASSIOPEIA], &no_boots, &mut rng).is_ok());
    }

    /// Test: Display follows the Ultimate Bravery layout
    #[test]
    fn test_display_layout() {
        let build = roll(&[CASSIOPEIA], 3);
        let text = build.to_string();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Ultimate Bravery");
        assert_eq!(lines[2], "Champion");
        assert_eq!(lines[4], "Cassiopeia");
        assert_eq!(lines[6], "Item Set");
        assert_eq!(lines[8].split(", ").count(), 6);
        assert_eq!(lines[10], "Rune Page");
        assert!(lines[12].starts_with(&format!(
            "Primary: {} - {}: ",
            build.primary_style.name, build.keystone.name
        )));
        assert!(lines[13].starts_with(&format!("Secondary: {}: ", build.secondary_style.name)));
        assert!(lines[14].starts_with("Stat Mods: "));
        assert_eq!(build.page_name(), "Bravery: Cassiopeia");
    }
}
