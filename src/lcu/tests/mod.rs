// Tests for LCU session bootstrap, rune pages and champ select



#[cfg(test)]
mod test_perks;
