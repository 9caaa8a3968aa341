mod character;
mod combat_power;
mod leaderboard;
