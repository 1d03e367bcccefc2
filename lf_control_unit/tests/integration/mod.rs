mod line_following;
mod properties;
mod speed_loop;
mod startup;
mod tuning_session;
