use crate::domain::model::{ElementTally, FourPillars};

/// 八字各自歸入五行後計數
pub fn tally_elements(pillars: &FourPillars) -> ElementTally {
    let mut tally = ElementTally::default();
    for element in pillars.elements() {
        tally.increment(element);
    }
    tally
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Branch, Element, Pillar, Stem};

    #[test]
    fn test_all_earth_chart() {
        let pillars = FourPillars {
            year: Pillar::new(Stem::Mu, Branch::Jin),
            month: Pillar::new(Stem::Gi, Branch::Chuk),
            day: Pillar::new(Stem::Mu, Branch::Sul),
            hour: Pillar::new(Stem::Gi, Branch::Mi),
        };

        let tally = tally_elements(&pillars);
        assert_eq!(tally.count(Element::Earth), 8);
        assert_eq!(tally.total(), 8);
        assert_eq!(tally.strongest(), Element::Earth);
        assert_eq!(tally.weakest(), Element::Wood);
    }

    #[test]
    fn test_mixed_chart() {
        // 경오 정인 병인 갑오
        let pillars = FourPillars {
            year: Pillar::new(Stem::Gyeong, Branch::O),
            month: Pillar::new(Stem::Jeong, Branch::In),
            day: Pillar::new(Stem::Byeong, Branch::In),
            hour: Pillar::new(Stem::Gap, Branch::O),
        };

        let tally = tally_elements(&pillars);
        assert_eq!(
            tally,
            ElementTally::from_counts([3, 4, 0, 1, 0])
        );
        assert_eq!(tally.strongest(), Element::Fire);
        assert_eq!(tally.weakest(), Element::Earth);
    }

    #[test]
    fn test_every_sexagenary_combination_sums_to_eight() {
        for i in 0..60 {
            let pillar = Pillar::from_indices(i, i);
            let pillars = FourPillars {
                year: pillar,
                month: Pillar::from_indices(i + 1, i + 3),
                day: Pillar::from_indices(i + 7, i + 5),
                hour: Pillar::from_indices(i * 3, i * 7),
            };
            assert_eq!(tally_elements(&pillars).total(), 8);
        }
    }
}
