mod layers_test;
mod weights_test;
