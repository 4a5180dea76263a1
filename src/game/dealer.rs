extern crate alloc;

use alloc::vec::Vec;

use crate::card::Card;
use crate::hand::DealerHand;
use crate::options::GameOptions;
use crate::result::Outcome;
use crate::shoe::Shoe;

/// Dealer plays their hand according to the house rules.
///
/// The dealer draws until reaching 17 or higher. If `stand_on_soft_17` is
/// true, dealer stands on any 17. Otherwise, dealer hits on soft 17.
///
/// Returns the cards drawn by the dealer.
pub(crate) fn dealer_play(
    dealer: &mut DealerHand,
    shoe: &mut Shoe,
    options: &GameOptions,
) -> Vec<Card> {
    let mut drawn_cards = Vec::new();

    loop {
        let value = dealer.value();
        if value > 17 {
            break;
        }
        if value == 17 && (!dealer.is_soft() || options.stand_on_soft_17) {
            break;
        }

        let card = shoe.draw();
        dealer.add_card(card);
        drawn_cards.push(card);
    }

    drawn_cards
}

/// Compares final totals once the dealer is done.
///
/// A player bust is checked before anything else, so it loses even when the
/// dealer has also gone over.
pub(crate) const fn resolve(player_value: u8, dealer_value: u8) -> Outcome {
    if player_value > 21 {
        Outcome::Bust
    } else if dealer_value > 21 || player_value > dealer_value {
        Outcome::Win
    } else if player_value < dealer_value {
        Outcome::Loss
    } else {
        Outcome::Push
    }
}
